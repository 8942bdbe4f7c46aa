use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{FieldErrors, HistoryCodecError},
    validation::validate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }

    /// Human-facing label used by form renderers.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Full Name",
            Field::Email => "Email Address",
            Field::Subject => "Subject",
            Field::Message => "Message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four user-entered text fields, before acceptance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
        };
        *slot = value.into();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl SubmissionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An accepted, immutable record of one form acceptance.
///
/// Serialized as `{ id, name, email, subject, message, submittedAt }` with `submittedAt` in
/// epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    id: SubmissionId,
    #[serde(flatten)]
    input: FormInput,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Accepts `input` with a fresh id stamped now, or returns the errors that block it.
    pub fn accept(input: FormInput) -> Result<Self, FieldErrors> {
        Self::accept_at(input, SubmissionId::generate(), Utc::now())
    }

    pub fn accept_at(
        input: FormInput,
        id: SubmissionId,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, FieldErrors> {
        let errors = validate(&input);
        if !errors.is_empty() {
            return Err(errors);
        }

        // Millisecond precision is all the wire format keeps.
        let submitted_at = DateTime::from_timestamp_millis(submitted_at.timestamp_millis())
            .unwrap_or(submitted_at);

        Ok(Self {
            id,
            input,
            submitted_at,
        })
    }

    pub fn id(&self) -> &SubmissionId {
        &self.id
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

pub fn encode_history(history: &[Submission]) -> Result<String, HistoryCodecError> {
    Ok(serde_json::to_string(history)?)
}

pub fn decode_history(raw: &str) -> Result<Vec<Submission>, HistoryCodecError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;

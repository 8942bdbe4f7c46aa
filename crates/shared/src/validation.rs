//! Field rules for the contact form.
//!
//! Every value is trimmed before its length is checked, and lengths are counted in UTF-16 code
//! units. Each field reports at most one message: an empty value short-circuits the length or
//! format rule.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    domain::{Field, FormInput},
    error::FieldErrors,
};

pub const NAME_MIN_CHARS: usize = 2;
pub const SUBJECT_MIN_CHARS: usize = 3;
pub const MESSAGE_MIN_CHARS: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn validate(input: &FormInput) -> FieldErrors {
    Field::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, input.get(field)).map(|msg| (field, msg)))
        .collect()
}

pub fn has_errors(errors: &FieldErrors) -> bool {
    !errors.is_empty()
}

pub fn validate_field(field: Field, value: &str) -> Option<String> {
    let trimmed = trim_form_value(value);
    let len = form_length(trimmed);

    let message = match field {
        Field::Name if trimmed.is_empty() => "Name is required",
        Field::Name if len < NAME_MIN_CHARS => "Name must be at least 2 characters",
        Field::Email if trimmed.is_empty() => "Email is required",
        Field::Email if !is_valid_email(value) => "Please enter a valid email address",
        Field::Subject if trimmed.is_empty() => "Subject is required",
        Field::Subject if len < SUBJECT_MIN_CHARS => "Subject must be at least 3 characters",
        Field::Message if trimmed.is_empty() => "Message is required",
        Field::Message if len < MESSAGE_MIN_CHARS => "Message must be at least 10 characters",
        _ => return None,
    };

    Some(message.to_string())
}

/// Strips whitespace and byte-order marks from both ends, as browser form values are trimmed.
pub fn trim_form_value(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Length in UTF-16 code units, the unit browser inputs count in.
pub fn form_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Matches `local@domain.tld` against the whole, untrimmed value.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;

//! Render-ready projection of the submission history and the post-submit banner.

use chrono::{DateTime, Local, TimeZone, Utc};
use shared::domain::Submission;

pub const SUCCESS_TITLE: &str = "Message Sent!";
pub const SUCCESS_DETAIL: &str =
    "Your message has been saved locally. In a production app, this would be sent to your inbox.";

/// Month, day and 12-hour time, e.g. `Oct 18, 03:45 PM`.
const TIMESTAMP_FORMAT: &str = "%b %-d, %I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntryView {
    pub id: String,
    pub subject: String,
    pub byline: String,
    pub submitted_label: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub title: String,
    pub entries: Vec<HistoryEntryView>,
}

impl HistoryView {
    /// `None` when there is nothing to show; timestamps use the local time zone.
    pub fn from_submissions(submissions: &[Submission]) -> Option<Self> {
        Self::from_submissions_in(submissions, &Local)
    }

    pub fn from_submissions_in<Tz>(submissions: &[Submission], tz: &Tz) -> Option<Self>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        if submissions.is_empty() {
            return None;
        }

        let entries = submissions
            .iter()
            .map(|submission| {
                let input = submission.input();
                HistoryEntryView {
                    id: submission.id().to_string(),
                    subject: input.subject.clone(),
                    byline: format!("{} · {}", input.name, input.email),
                    submitted_label: format_timestamp(submission.submitted_at(), tz),
                    message: input.message.clone(),
                }
            })
            .collect();

        Some(Self {
            title: format!("Saved Messages ({})", submissions.len()),
            entries,
        })
    }
}

pub fn format_timestamp<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
#[path = "tests/history_view_tests.rs"]
mod tests;

//! Plain-text rendering of the controller surfaces.

use std::fmt::Write as _;

use client_core::{HistoryView, SUCCESS_DETAIL, SUCCESS_TITLE};
use shared::{domain::Field, error::FieldErrors};

pub fn field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for field in Field::ALL {
        if let Some(message) = errors.get(field) {
            let _ = writeln!(out, "  {}: {message}", field.label());
        }
    }
    out
}

pub fn success_banner(subject: &str) -> String {
    format!("{SUCCESS_TITLE}\n{SUCCESS_DETAIL}\n  subject: {subject}\n")
}

pub fn history(view: Option<&HistoryView>) -> String {
    let Some(view) = view else {
        return "No saved messages.\n".to_string();
    };

    let mut out = format!("{}\n", view.title);
    for entry in &view.entries {
        let _ = writeln!(out, "\n{}  [{}]", entry.subject, entry.submitted_label);
        let _ = writeln!(out, "{}", entry.byline);
        let _ = writeln!(out, "{}", entry.message);
    }
    out
}

pub fn clear_summary(cleared: usize, persisted: bool) -> String {
    if persisted {
        format!("Cleared {cleared} saved message(s).\n")
    } else {
        format!(
            "Cleared {cleared} saved message(s) for this run only; the store was not updated.\n"
        )
    }
}

pub fn clear_summary_json(cleared: usize, persisted: bool) -> String {
    serde_json::json!({ "cleared": cleared, "persisted": persisted }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::HistoryEntryView;

    #[test]
    fn lists_errors_in_field_order_with_labels() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Message, "Message is required");
        errors.insert(Field::Name, "Name is required");

        assert_eq!(
            field_errors(&errors),
            "  Full Name: Name is required\n  Message: Message is required\n"
        );
    }

    #[test]
    fn empty_history_has_placeholder() {
        assert_eq!(history(None), "No saved messages.\n");
    }

    #[test]
    fn renders_each_entry() {
        let view = HistoryView {
            title: "Saved Messages (1)".into(),
            entries: vec![HistoryEntryView {
                id: "abc".into(),
                subject: "Hi there".into(),
                byline: "Jo · a@b.co".into(),
                submitted_label: "Oct 18, 03:45 PM".into(),
                message: "This is long enough".into(),
            }],
        };

        let text = history(Some(&view));
        assert!(text.starts_with("Saved Messages (1)\n"));
        assert!(text.contains("Hi there  [Oct 18, 03:45 PM]"));
        assert!(text.contains("Jo · a@b.co"));
    }

    #[test]
    fn clear_summary_mentions_unsaved_clear() {
        assert_eq!(clear_summary(2, true), "Cleared 2 saved message(s).\n");
        assert!(clear_summary(2, false).contains("store was not updated"));
    }

    #[test]
    fn clear_summary_json_reports_both_fields() {
        let value: serde_json::Value =
            serde_json::from_str(&clear_summary_json(3, false)).expect("json");
        assert_eq!(value["cleared"], 3);
        assert_eq!(value["persisted"], false);
    }
}

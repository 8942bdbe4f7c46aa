use super::*;
use chrono::FixedOffset;
use shared::domain::{FormInput, SubmissionId};

fn submission(id: &str, subject: &str, millis: i64) -> Submission {
    Submission::accept_at(
        FormInput::new("Jo", "a@b.co", subject, "This is long enough"),
        SubmissionId(id.to_string()),
        Utc.timestamp_millis_opt(millis).single().expect("timestamp"),
    )
    .expect("valid submission")
}

#[test]
fn empty_history_is_hidden() {
    assert_eq!(HistoryView::from_submissions(&[]), None);
}

#[test]
fn entries_keep_newest_first_order_and_count() {
    let history = vec![
        submission("2", "Second subject", 1_760_800_000_000),
        submission("1", "First subject", 1_760_700_000_000),
    ];
    let view = HistoryView::from_submissions_in(&history, &Utc).expect("view");

    assert_eq!(view.title, "Saved Messages (2)");
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.entries[0].id, "2");
    assert_eq!(view.entries[0].subject, "Second subject");
    assert_eq!(view.entries[0].byline, "Jo · a@b.co");
    assert_eq!(view.entries[0].message, "This is long enough");
    assert_eq!(view.entries[1].id, "1");
}

#[test]
fn timestamp_uses_short_month_and_twelve_hour_clock() {
    let at = Utc
        .with_ymd_and_hms(2026, 10, 18, 15, 45, 0)
        .single()
        .expect("utc time");
    assert_eq!(format_timestamp(at, &Utc), "Oct 18, 03:45 PM");

    let morning = Utc
        .with_ymd_and_hms(2026, 3, 5, 9, 7, 0)
        .single()
        .expect("utc time");
    assert_eq!(format_timestamp(morning, &Utc), "Mar 5, 09:07 AM");
}

#[test]
fn timestamp_follows_the_given_zone() {
    let at = Utc
        .with_ymd_and_hms(2026, 10, 18, 23, 30, 0)
        .single()
        .expect("utc time");
    let plus_two = FixedOffset::east_opt(2 * 3600).expect("offset");
    assert_eq!(format_timestamp(at, &plus_two), "Oct 19, 01:30 AM");
}

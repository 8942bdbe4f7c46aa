use super::*;
use chrono::TimeZone;

fn sample(id: &str, millis: i64) -> Submission {
    Submission::accept_at(
        FormInput::new("Jo", "a@b.co", "Hi there", "This is long enough"),
        SubmissionId(id.to_string()),
        Utc.timestamp_millis_opt(millis).single().expect("timestamp"),
    )
    .expect("valid input")
}

#[test]
fn accept_refuses_invalid_input() {
    let errors = Submission::accept(FormInput::default()).expect_err("empty input rejected");
    assert_eq!(errors.len(), 4);
}

#[test]
fn accept_generates_distinct_ids() {
    let input = FormInput::new("Jo", "a@b.co", "Hi there", "This is long enough");
    let first = Submission::accept(input.clone()).expect("first");
    let second = Submission::accept(input).expect("second");
    assert_ne!(first.id(), second.id());
}

#[test]
fn serializes_with_camel_case_timestamp_in_millis() {
    let submission = sample("abc", 1_700_000_000_123);
    let value = serde_json::to_value(&submission).expect("json");

    assert_eq!(value["id"], "abc");
    assert_eq!(value["name"], "Jo");
    assert_eq!(value["email"], "a@b.co");
    assert_eq!(value["subject"], "Hi there");
    assert_eq!(value["message"], "This is long enough");
    assert_eq!(value["submittedAt"], 1_700_000_000_123_i64);
}

#[test]
fn decodes_records_written_by_other_producers() {
    let raw = r#"[{"id":"not-a-uuid","name":"Ann","email":"ann@x.io","subject":"Hello","message":"Some long message","submittedAt":1700000000000}]"#;
    let history = decode_history(raw).expect("decode");

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id().as_str(), "not-a-uuid");
    assert_eq!(history[0].input().name, "Ann");
    assert_eq!(history[0].submitted_at().timestamp_millis(), 1_700_000_000_000);
}

#[test]
fn history_round_trip_preserves_order() {
    let history = vec![sample("newest", 3_000), sample("middle", 2_000), sample("oldest", 1_000)];
    let raw = encode_history(&history).expect("encode");
    assert_eq!(decode_history(&raw).expect("decode"), history);
}

#[test]
fn decode_rejects_malformed_payload() {
    assert!(decode_history("{not json").is_err());
    assert!(decode_history(r#"[{"id":"x"}]"#).is_err());
}

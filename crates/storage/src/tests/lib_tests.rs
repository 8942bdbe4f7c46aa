use super::*;
use chrono::{TimeZone, Utc};
use shared::domain::{FormInput, SubmissionId};

fn submission(id: &str, subject: &str, millis: i64) -> Submission {
    Submission::accept_at(
        FormInput::new("Jo", "a@b.co", subject, "This is long enough"),
        SubmissionId(id.to_string()),
        Utc.timestamp_millis_opt(millis).single().expect("timestamp"),
    )
    .expect("valid submission")
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn missing_history_loads_empty() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert!(storage.load().await.is_empty());
}

#[tokio::test]
async fn save_then_load_preserves_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let history = vec![
        submission("3", "Third one", 3_000),
        submission("2", "Second one", 2_000),
        submission("1", "First one", 1_000),
    ];

    storage.save(&history).await.expect("save");
    assert_eq!(storage.load().await, history);
}

#[tokio::test]
async fn save_overwrites_previous_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .save(&[submission("1", "First one", 1_000)])
        .await
        .expect("first save");
    storage.save(&[]).await.expect("clear save");

    assert!(storage.load().await.is_empty());
    assert_eq!(
        storage.get_value(SUBMISSIONS_KEY).await.expect("read"),
        Some("[]".to_string())
    );
}

#[tokio::test]
async fn corrupt_history_degrades_to_empty() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .put_value(SUBMISSIONS_KEY, "{\"definitely\": \"not a list\"")
        .await
        .expect("stage corrupt value");

    assert!(storage.load().await.is_empty());
}

#[tokio::test]
async fn unrelated_keys_do_not_collide() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.put_value("theme", "dark").await.expect("theme");
    storage
        .save(&[submission("1", "First one", 1_000)])
        .await
        .expect("save");

    assert_eq!(
        storage.get_value("theme").await.expect("theme read"),
        Some("dark".to_string())
    );
    assert_eq!(storage.load().await.len(), 1);
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("contact.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn memory_store_round_trips_and_recovers_from_garbage() {
    let store = MemoryStore::new();
    let history = vec![submission("2", "Second one", 2_000), submission("1", "First one", 1_000)];
    store.save(&history).await.expect("save");
    assert_eq!(store.load().await, history);

    let corrupt = MemoryStore::with_raw("not json");
    assert!(corrupt.load().await.is_empty());
}

#[tokio::test]
async fn read_only_memory_store_rejects_writes() {
    let store = MemoryStore::read_only();
    assert!(store.save(&[]).await.is_err());
    assert!(store.raw().is_none());
}

#[test]
fn sqlite_path_ignores_memory_and_foreign_urls() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(sqlite_path("postgres://localhost/db"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/contact.db?mode=rwc"),
        Some(PathBuf::from("./data/contact.db"))
    );
}

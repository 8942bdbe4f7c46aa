use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::warn;

use shared::domain::{decode_history, encode_history, Submission};

mod memory;
pub use memory::MemoryStore;

/// Slot holding the JSON-encoded submission history.
pub const SUBMISSIONS_KEY: &str = "contact-submissions";

const MEMORY_URL: &str = "sqlite::memory:";

/// Persistence for the ordered (newest first) submission history.
///
/// `load` never fails: a missing or undecodable value reads as an empty history.
/// `save` replaces the stored value wholesale.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn load(&self) -> Vec<Submission>;
    async fn save(&self, history: &[Submission]) -> Result<()>;
}

/// Key/value store backed by one SQLite file per profile.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite database url '{database_url}'"))?
            .create_if_missing(true);
        // Each in-memory connection is a separate database.
        let max_connections = if database_url.starts_with(MEMORY_URL) { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to apply storage migrations")?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read key '{key}'"))?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    pub async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write key '{key}'"))?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for Storage {
    async fn load(&self) -> Vec<Submission> {
        match self.get_value(SUBMISSIONS_KEY).await {
            Ok(raw) => decode_or_empty(raw.as_deref()),
            Err(err) => {
                warn!(key = SUBMISSIONS_KEY, error = %err, "history read failed; starting empty");
                Vec::new()
            }
        }
    }

    async fn save(&self, history: &[Submission]) -> Result<()> {
        let raw = encode_history(history).context("failed to encode submission history")?;
        self.put_value(SUBMISSIONS_KEY, &raw).await
    }
}

pub(crate) fn decode_or_empty(raw: Option<&str>) -> Vec<Submission> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match decode_history(raw) {
        Ok(history) => history,
        Err(err) => {
            warn!(
                key = SUBMISSIONS_KEY,
                error = %err,
                "discarding undecodable submission history"
            );
            Vec::new()
        }
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with(MEMORY_URL) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

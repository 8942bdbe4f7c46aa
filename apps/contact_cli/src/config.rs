use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "contact.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub submit_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/contact.db".into(),
            submit_delay_ms: 1200,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database_url: Option<String>,
    submit_delay_ms: Option<u64>,
}

pub fn load_settings() -> Result<Settings> {
    let raw = match fs::read_to_string(CONFIG_FILE) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => return Err(err).with_context(|| format!("failed to read {CONFIG_FILE}")),
    };
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the config file, then the environment.
pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: FileConfig =
            toml::from_str(raw).with_context(|| format!("invalid {CONFIG_FILE}"))?;
        if let Some(v) = file_cfg.database_url {
            settings.database_url = v;
        }
        if let Some(v) = file_cfg.submit_delay_ms {
            settings.submit_delay_ms = v;
        }
    }

    if let Some(v) = env("CONTACT_DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("APP__SUBMIT_DELAY_MS") {
        settings.submit_delay_ms = v
            .trim()
            .parse()
            .with_context(|| format!("APP__SUBMIT_DELAY_MS must be milliseconds, got '{v}'"))?;
    }

    Ok(settings)
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

/// Database url for a named profile kept under `base_dir`.
pub fn profile_database_url(base_dir: &Path, profile: &str) -> String {
    normalize_database_url(&base_dir.join(format!("{profile}.db")).to_string_lossy())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use shared::domain::{encode_history, Submission};

use crate::{decode_or_empty, SubmissionStore};

/// Process-local store that keeps the encoded history in memory.
///
/// The value goes through the same JSON codec as [`crate::Storage`], so decode failures can be
/// staged with [`MemoryStore::with_raw`].
#[derive(Default)]
pub struct MemoryStore {
    raw: Mutex<Option<String>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            fail_writes: false,
        }
    }

    /// A store whose `save` always fails, as a full quota would.
    pub fn read_only() -> Self {
        Self {
            raw: Mutex::new(None),
            fail_writes: true,
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|slot| slot.clone())
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn load(&self) -> Vec<Submission> {
        decode_or_empty(self.raw().as_deref())
    }

    async fn save(&self, history: &[Submission]) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("memory store is read-only"));
        }

        let encoded = encode_history(history).context("failed to encode submission history")?;
        let mut slot = self
            .raw
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        *slot = Some(encoded);
        Ok(())
    }
}

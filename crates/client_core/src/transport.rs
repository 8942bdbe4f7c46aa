use std::time::Duration;

use async_trait::async_trait;
use shared::domain::FormInput;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1200);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("delivery unavailable: {0}")]
    Unavailable(String),
}

/// Delivers an accepted form somewhere. The controller stays in `Submitting` while this runs.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn deliver(&self, input: &FormInput) -> Result<(), TransportError>;
}

/// Stand-in delivery: waits a fixed delay and always succeeds. Nothing leaves the process.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    delay: Duration,
}

impl SimulatedTransport {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl SubmissionTransport for SimulatedTransport {
    async fn deliver(&self, input: &FormInput) -> Result<(), TransportError> {
        debug!(
            delay_ms = self.delay.as_millis() as u64,
            subject = %input.subject,
            "simulating submission delivery"
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

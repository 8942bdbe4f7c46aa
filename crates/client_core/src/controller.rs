use std::sync::Arc;

use shared::{
    domain::{Field, FormInput, Submission},
    error::FieldErrors,
    validation::validate,
};
use storage::SubmissionStore;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::transport::{SubmissionTransport, TransportError};

const EVENT_CHANNEL_CAPACITY: usize = 64;

static NO_ERRORS: FieldErrors = FieldErrors::EMPTY;

/// Where the form is in its lifecycle. Each variant owns exactly the state valid in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Editing {
        input: FormInput,
        errors: FieldErrors,
    },
    /// Input is frozen while delivery is in flight.
    Submitting { input: FormInput },
    /// Echo of the accepted submission until `reset`.
    Submitted { submission: Submission },
}

impl Phase {
    fn editing(input: FormInput) -> Self {
        Phase::Editing {
            input,
            errors: FieldErrors::new(),
        }
    }

    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Editing { .. } => PhaseKind::Editing,
            Phase::Submitting { .. } => PhaseKind::Submitting,
            Phase::Submitted { .. } => PhaseKind::Submitted,
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::editing(FormInput::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Editing,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    PhaseChanged(PhaseKind),
    HistoryChanged { len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(Submission),
    Rejected(FieldErrors),
    /// Delivery failed; the form is back in `Editing` with its input intact.
    DeliveryFailed(String),
    /// The controller was not in the phase the call requires.
    NotEditing,
}

pub struct FormController {
    store: Arc<dyn SubmissionStore>,
    transport: Arc<dyn SubmissionTransport>,
    phase: Phase,
    history: Vec<Submission>,
    events: broadcast::Sender<FormEvent>,
}

impl FormController {
    /// Builds a controller in `Editing` with the history loaded once from `store`.
    pub async fn initialize(
        store: Arc<dyn SubmissionStore>,
        transport: Arc<dyn SubmissionTransport>,
    ) -> Self {
        let history = store.load().await;
        debug!(len = history.len(), "loaded submission history");
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            transport,
            phase: Phase::default(),
            history,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn input(&self) -> &FormInput {
        match &self.phase {
            Phase::Editing { input, .. } | Phase::Submitting { input } => input,
            Phase::Submitted { submission } => submission.input(),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        match &self.phase {
            Phase::Editing { errors, .. } => errors,
            Phase::Submitting { .. } | Phase::Submitted { .. } => &NO_ERRORS,
        }
    }

    /// Newest first.
    pub fn history(&self) -> &[Submission] {
        &self.history
    }

    /// Updates one field and drops its error, if any. Ignored outside `Editing`.
    pub fn edit_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        let phase = self.phase.kind();
        let Phase::Editing { input, errors } = &mut self.phase else {
            debug!(%field, ?phase, "ignoring edit outside editing");
            return false;
        };

        input.set(field, value);
        if errors.clear_field(field) {
            debug!(%field, "cleared field error after edit");
        }
        true
    }

    /// Validates, delivers, and records the current input.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let input = match self.begin_submit() {
            Ok(input) => input,
            Err(outcome) => return outcome,
        };

        let transport = Arc::clone(&self.transport);
        let delivery = transport.deliver(&input).await;
        self.finish_submit(delivery).await
    }

    /// First half of [`submit`](Self::submit): validates and, if clean, enters `Submitting`.
    ///
    /// Returns the input snapshot to deliver.
    pub fn begin_submit(&mut self) -> Result<FormInput, SubmitOutcome> {
        let phase = self.phase.kind();
        let Phase::Editing { input, errors } = &mut self.phase else {
            debug!(?phase, "submit ignored outside editing");
            return Err(SubmitOutcome::NotEditing);
        };

        let found = validate(input);
        if !found.is_empty() {
            debug!(fields = found.len(), "submit rejected by validation");
            *errors = found.clone();
            return Err(SubmitOutcome::Rejected(found));
        }

        let input = std::mem::take(input);
        self.phase = Phase::Submitting {
            input: input.clone(),
        };
        self.emit(FormEvent::PhaseChanged(PhaseKind::Submitting));
        Ok(input)
    }

    /// Second half of [`submit`](Self::submit): records the submission once delivery completes.
    pub async fn finish_submit(&mut self, delivery: Result<(), TransportError>) -> SubmitOutcome {
        let Phase::Submitting { input } = &mut self.phase else {
            return SubmitOutcome::NotEditing;
        };
        let input = std::mem::take(input);

        if let Err(err) = delivery {
            warn!(error = %err, "submission delivery failed");
            self.phase = Phase::editing(input);
            self.emit(FormEvent::PhaseChanged(PhaseKind::Editing));
            return SubmitOutcome::DeliveryFailed(err.to_string());
        }

        let submission = match Submission::accept(input.clone()) {
            Ok(submission) => submission,
            Err(errors) => {
                self.phase = Phase::Editing {
                    input,
                    errors: errors.clone(),
                };
                self.emit(FormEvent::PhaseChanged(PhaseKind::Editing));
                return SubmitOutcome::Rejected(errors);
            }
        };

        self.history.insert(0, submission.clone());
        self.persist_history().await;
        info!(
            submission_id = %submission.id(),
            len = self.history.len(),
            "accepted contact submission"
        );

        self.phase = Phase::Submitted {
            submission: submission.clone(),
        };
        self.emit(FormEvent::HistoryChanged {
            len: self.history.len(),
        });
        self.emit(FormEvent::PhaseChanged(PhaseKind::Submitted));
        SubmitOutcome::Accepted(submission)
    }

    /// Drops an in-flight delivery and returns to `Editing` with the input intact.
    pub fn abandon_submit(&mut self) -> bool {
        let Phase::Submitting { input } = &mut self.phase else {
            return false;
        };
        let input = std::mem::take(input);
        self.phase = Phase::editing(input);
        debug!("abandoned in-flight submission");
        self.emit(FormEvent::PhaseChanged(PhaseKind::Editing));
        true
    }

    /// Leaves `Submitted` for a blank form. No-op in any other phase.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.phase, Phase::Submitted { .. }) {
            return false;
        }
        self.phase = Phase::default();
        self.emit(FormEvent::PhaseChanged(PhaseKind::Editing));
        true
    }

    /// Empties the history in memory and in the store. The phase is left alone.
    ///
    /// Returns `false` when the store kept its previous value.
    pub async fn clear_all(&mut self) -> bool {
        let cleared = self.history.len();
        self.history.clear();
        let persisted = self.persist_history().await;
        info!(cleared, persisted, "cleared submission history");
        self.emit(FormEvent::HistoryChanged { len: 0 });
        persisted
    }

    async fn persist_history(&self) -> bool {
        match self.store.save(&self.history).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    error = %err,
                    len = self.history.len(),
                    "failed to persist submission history; keeping in-memory copy"
                );
                false
            }
        }
    }

    fn emit(&self, event: FormEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

//! Form controller for the contact form: field state, the editing/submitting/submitted state
//! machine, delivery, and the persisted submission history.

pub mod controller;
pub mod history_view;
pub mod transport;

pub use controller::{FormController, FormEvent, Phase, PhaseKind, SubmitOutcome};
pub use history_view::{HistoryEntryView, HistoryView, SUCCESS_DETAIL, SUCCESS_TITLE};
pub use transport::{SimulatedTransport, SubmissionTransport, TransportError, DEFAULT_SUBMIT_DELAY};

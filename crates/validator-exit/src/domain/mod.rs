//! Domain model for the exit batch.
//!
//! - [`ValidatorReference`]: what `ethdo` and the beacon API are told about a key
//! - [`ExitOutcome`]: classified result of one exit submission
//! - [`ValidatorStatus`]: status reported by the beacon node
//! - [`Redactor`]: masks secret values in anything printed
//! - [`RunState`]: the driver's checkpoint used for interrupt reporting

mod outcome;
mod redaction;
mod reference;
mod run_state;
mod status;

pub use outcome::ExitOutcome;
pub use redaction::Redactor;
pub use reference::{RunMode, Secret, ValidatorReference, REDACTED};
pub use run_state::{ResumeHint, RunState};
pub use status::ValidatorStatus;

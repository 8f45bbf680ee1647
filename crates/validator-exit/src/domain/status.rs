//! Validator status as reported by the beacon API.

use std::fmt;

/// Status of a validator (`data.status` of the beacon validator endpoint).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidatorStatus {
    PendingInitialized,
    PendingQueued,
    ActiveOngoing,
    ActiveExiting,
    ActiveSlashed,
    ExitedUnslashed,
    ExitedSlashed,
    WithdrawalPossible,
    WithdrawalDone,
    /// Any status this tool does not know about.
    Other(String),
}

impl ValidatorStatus {
    /// Polling stops once one of these is observed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ValidatorStatus::ActiveExiting
                | ValidatorStatus::ExitedUnslashed
                | ValidatorStatus::ExitedSlashed
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            ValidatorStatus::PendingInitialized => "pending_initialized",
            ValidatorStatus::PendingQueued => "pending_queued",
            ValidatorStatus::ActiveOngoing => "active_ongoing",
            ValidatorStatus::ActiveExiting => "active_exiting",
            ValidatorStatus::ActiveSlashed => "active_slashed",
            ValidatorStatus::ExitedUnslashed => "exited_unslashed",
            ValidatorStatus::ExitedSlashed => "exited_slashed",
            ValidatorStatus::WithdrawalPossible => "withdrawal_possible",
            ValidatorStatus::WithdrawalDone => "withdrawal_done",
            ValidatorStatus::Other(status) => status,
        }
    }
}

impl From<&str> for ValidatorStatus {
    fn from(s: &str) -> Self {
        match s {
            "pending_initialized" => ValidatorStatus::PendingInitialized,
            "pending_queued" => ValidatorStatus::PendingQueued,
            "active_ongoing" => ValidatorStatus::ActiveOngoing,
            "active_exiting" => ValidatorStatus::ActiveExiting,
            "active_slashed" => ValidatorStatus::ActiveSlashed,
            "exited_unslashed" => ValidatorStatus::ExitedUnslashed,
            "exited_slashed" => ValidatorStatus::ExitedSlashed,
            "withdrawal_possible" => ValidatorStatus::WithdrawalPossible,
            "withdrawal_done" => ValidatorStatus::WithdrawalDone,
            other => ValidatorStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ValidatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Exit submission outcomes.

use std::fmt;

/// Classified result of one `ethdo validator exit` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitOutcome {
    /// Exit command succeeded.
    Success,
    /// Validator is already in `active_exiting`.
    AlreadyExiting,
    /// Validator is already in `exited_unslashed`.
    AlreadyExited,
    /// Beacon node does not know the validator.
    UnknownValidator,
    /// Anything else. Halts the batch.
    Failure,
}

impl ExitOutcome {
    /// All outcomes, in report order.
    pub const ALL: [ExitOutcome; 5] = [
        ExitOutcome::Success,
        ExitOutcome::AlreadyExiting,
        ExitOutcome::AlreadyExited,
        ExitOutcome::UnknownValidator,
        ExitOutcome::Failure,
    ];

    /// Classify by the command's stderr first, then its exit code.
    ///
    /// Substrings are checked in priority order and the first match wins. A
    /// missing exit code (killed by a signal) counts as nonzero.
    pub fn classify(exit_code: Option<i32>, stderr: &str) -> Self {
        if stderr.contains("active_exiting") {
            ExitOutcome::AlreadyExiting
        } else if stderr.contains("exited_unslashed") {
            ExitOutcome::AlreadyExited
        } else if stderr.contains("unknown validator") {
            ExitOutcome::UnknownValidator
        } else if exit_code == Some(0) {
            ExitOutcome::Success
        } else {
            ExitOutcome::Failure
        }
    }

    /// Only a failure stops the batch.
    pub fn halts_batch(&self) -> bool {
        matches!(self, ExitOutcome::Failure)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExitOutcome::Success => "success",
            ExitOutcome::AlreadyExiting => "already_exiting",
            ExitOutcome::AlreadyExited => "already_exited",
            ExitOutcome::UnknownValidator => "unknown_validator",
            ExitOutcome::Failure => "failure",
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_exit_is_success() {
        assert_eq!(ExitOutcome::classify(Some(0), ""), ExitOutcome::Success);
    }

    #[test]
    fn test_known_states_continue() {
        let cases = [
            ("validator is in state active_exiting", ExitOutcome::AlreadyExiting),
            ("validator is in state exited_unslashed", ExitOutcome::AlreadyExited),
            ("unknown validator", ExitOutcome::UnknownValidator),
        ];
        for (stderr, expected) in cases {
            let outcome = ExitOutcome::classify(Some(1), stderr);
            assert_eq!(outcome, expected, "stderr: {stderr}");
            assert!(!outcome.halts_batch());
        }
    }

    #[test]
    fn test_first_match_wins() {
        let stderr = "unknown validator; exited_unslashed; active_exiting";
        assert_eq!(
            ExitOutcome::classify(Some(1), stderr),
            ExitOutcome::AlreadyExiting
        );
        assert_eq!(
            ExitOutcome::classify(Some(1), "unknown validator after exited_unslashed"),
            ExitOutcome::AlreadyExited
        );
    }

    #[test]
    fn test_unrecognised_nonzero_exit_fails() {
        let outcome = ExitOutcome::classify(Some(2), "failed to connect to beacon node");
        assert_eq!(outcome, ExitOutcome::Failure);
        assert!(outcome.halts_batch());
    }

    #[test]
    fn test_signal_termination_fails() {
        assert_eq!(ExitOutcome::classify(None, ""), ExitOutcome::Failure);
    }

    #[test]
    fn test_substring_match_is_case_sensitive() {
        assert_eq!(
            ExitOutcome::classify(Some(1), "Unknown Validator"),
            ExitOutcome::Failure
        );
    }
}

//! Driver checkpoint and resume hints.

use std::fmt;

use super::RunMode;

/// Mutable progress of a batch run.
///
/// `current_index`/`current_key` always describe the key that is in flight or
/// was handled last, so an interrupt at any point reports a resumable position.
#[derive(Debug, Clone)]
pub struct RunState {
    mode: RunMode,
    start_index: usize,
    limit: Option<usize>,
    resume_from: Option<String>,
    current_index: usize,
    current_key: Option<String>,
}

impl RunState {
    pub fn new(
        mode: RunMode,
        start_index: usize,
        limit: Option<usize>,
        resume_from: Option<String>,
    ) -> Self {
        Self {
            mode,
            start_index,
            limit,
            resume_from,
            current_index: start_index,
            current_key: None,
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Resume target; only honoured in mnemonic mode.
    pub fn resume_from(&self) -> Option<&str> {
        match self.mode {
            RunMode::Mnemonic => self.resume_from.as_deref(),
            RunMode::PrivateKey => None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current_key.as_deref()
    }

    /// Record the absolute index of the key being looked at.
    pub fn select(&mut self, index: usize) {
        self.current_index = index;
    }

    /// Record the key that is about to be processed.
    ///
    /// Private keys are not retained; their position is the index.
    pub fn begin(&mut self, key: &str) {
        if self.mode == RunMode::Mnemonic {
            self.current_key = Some(key.to_string());
        }
    }

    /// Where a new run should pick up after an interrupt.
    pub fn resume_hint(&self) -> ResumeHint {
        match (self.mode, &self.current_key) {
            (RunMode::PrivateKey, _) => ResumeHint::StartIndex(self.current_index),
            (RunMode::Mnemonic, Some(key)) => ResumeHint::ResumeFrom(key.clone()),
            (RunMode::Mnemonic, None) => ResumeHint::NotStarted,
        }
    }
}

/// Command-line fragment that resumes an interrupted run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeHint {
    /// Private-key mode: restart at this absolute index.
    StartIndex(usize),
    /// Mnemonic mode: restart at this key.
    ResumeFrom(String),
    /// Interrupted before any key was processed.
    NotStarted,
}

impl ResumeHint {
    /// The flag to pass on the next run, if any.
    pub fn flag(&self) -> Option<String> {
        match self {
            ResumeHint::StartIndex(index) => Some(format!("--start-index {index}")),
            ResumeHint::ResumeFrom(key) => Some(format!("--resume-from {key}")),
            ResumeHint::NotStarted => None,
        }
    }
}

impl fmt::Display for ResumeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumeHint::StartIndex(index) => write!(
                f,
                "Last processed private key index: {index}. To resume, run with: --start-index {index}"
            ),
            ResumeHint::ResumeFrom(key) => write!(
                f,
                "Last processed (or in-progress) key: {key}. To resume, run with: --resume-from {key}"
            ),
            ResumeHint::NotStarted => f.write_str("Interrupted before processing any keys."),
        }
    }
}

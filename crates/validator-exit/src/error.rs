//! Error types for the exit batch.
//!
//! Everything here is a pre-flight failure: the process reports it and exits
//! non-zero before any key is submitted. Per-key problems are not errors, they
//! are [`ExitOutcome`](crate::domain::ExitOutcome)s and logged statuses.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::loader::LoadError;

/// Pre-flight errors that abort the run.
#[derive(Debug, Error)]
pub enum ExitError {
    /// Invalid run configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A key, index or credentials file could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Credentials file is required in mnemonic mode but absent
    #[error("Env file '{}' not found. Please create it or specify --env-file.", path.display())]
    CredentialsNotFound { path: PathBuf },

    /// Start index points past the loaded keys
    #[error("Start index {start_index} is out of bounds (total keys: {total})")]
    StartIndexOutOfBounds { start_index: usize, total: usize },

    /// The beacon API client could not be constructed
    #[error("Failed to build beacon API client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type for pre-flight operations
pub type ExitResult<T> = Result<T, ExitError>;

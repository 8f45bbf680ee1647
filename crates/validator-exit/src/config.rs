//! # Run Configuration
//!
//! Plain configuration structs built from the command line (see [`crate::cli`]).
//!
//! - [`ExitConfig`]: how each key is exited and polled (endpoint, timeouts, delays)
//! - [`RunConfig`]: which keys are processed (source, filters, resume point)
//!
//! All values have sane defaults matching the CLI defaults.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::RunMode;

/// Default beacon node used for both `ethdo --connection` and status queries.
pub const DEFAULT_CONNECTION: &str = "https://lh-ne-gno-mainnet-shared-1-1.eu-central-5.gateway.fm";

/// Default `ethdo --timeout` value.
pub const DEFAULT_COMMAND_TIMEOUT: &str = "40s";

/// Default credentials file holding `MNEMONIC`.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default exit executable, looked up on `PATH`.
pub const DEFAULT_ETHDO_BIN: &str = "ethdo";

/// Environment variable overriding the exit executable.
pub const ETHDO_BIN_ENV: &str = "ETHDO_BIN";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `--limit` was zero or negative.
    #[error("Limit must be a positive integer (got {0})")]
    NonPositiveLimit(i64),

    /// Empty beacon node URL.
    #[error("Connection URL must not be empty")]
    EmptyConnection,

    /// Polling enabled with zero attempts.
    #[error("Status polling needs at least one attempt")]
    ZeroPollAttempts,
}

/// Exit submission and status polling configuration.
#[derive(Debug, Clone)]
pub struct ExitConfig {
    /// Beacon node URL (`ethdo --connection` and the status API).
    pub connection: String,
    /// Timeout string handed to `ethdo --timeout` unchanged.
    pub command_timeout: String,
    /// Exit executable.
    pub ethdo_bin: PathBuf,
    /// Pause after every processed key.
    pub key_delay: Duration,
    /// Poll the beacon node after each submission.
    pub wait_for_status: bool,
    /// Status polling parameters.
    pub poll: PollConfig,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            connection: DEFAULT_CONNECTION.to_string(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT.to_string(),
            ethdo_bin: PathBuf::from(DEFAULT_ETHDO_BIN),
            key_delay: Duration::from_secs(1),
            wait_for_status: true,
            poll: PollConfig::default(),
        }
    }
}

impl ExitConfig {
    /// Validate endpoint and polling parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.trim().is_empty() {
            return Err(ConfigError::EmptyConnection);
        }
        if self.wait_for_status && self.poll.max_attempts == 0 {
            return Err(ConfigError::ZeroPollAttempts);
        }
        Ok(())
    }
}

/// Status polling parameters.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Attempts per validator before moving on.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Where the keys come from. The variant fixes the [`RunMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySourceConfig {
    /// Operators YAML file, optionally filtered to one operator.
    Operators {
        path: PathBuf,
        operator: Option<String>,
    },
    /// Private-key text dump.
    PrivateKeys { path: PathBuf },
}

impl KeySourceConfig {
    /// Run mode implied by this source.
    pub fn mode(&self) -> RunMode {
        match self {
            KeySourceConfig::Operators { .. } => RunMode::Mnemonic,
            KeySourceConfig::PrivateKeys { .. } => RunMode::PrivateKey,
        }
    }
}

/// Key selection configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: KeySourceConfig,
    /// Optional pubkey → index lookup file (mnemonic mode only).
    pub index_file: Option<PathBuf>,
    /// Credentials file with `MNEMONIC` (mnemonic mode only).
    pub credentials_file: PathBuf,
    /// First key to process, 0-based, before the limit applies.
    pub start_index: usize,
    /// Maximum keys to process. Raw so non-positive values can be reported.
    pub limit: Option<i64>,
    /// Key to resume at (mnemonic mode only).
    pub resume_from: Option<String>,
}

impl RunConfig {
    /// Create a configuration for `source` with defaults for everything else.
    pub fn new(source: KeySourceConfig) -> Self {
        Self {
            source,
            index_file: None,
            credentials_file: PathBuf::from(DEFAULT_ENV_FILE),
            start_index: 0,
            limit: None,
            resume_from: None,
        }
    }

    /// Run mode implied by the key source.
    pub fn mode(&self) -> RunMode {
        self.source.mode()
    }

    /// The validated limit.
    pub fn limit(&self) -> Result<Option<usize>, ConfigError> {
        match self.limit {
            None => Ok(None),
            Some(limit) if limit <= 0 => Err(ConfigError::NonPositiveLimit(limit)),
            Some(limit) => Ok(Some(usize::try_from(limit).unwrap_or(usize::MAX))),
        }
    }
}

/// Convert a `--sleep` value to a delay. Zero, negative and non-finite values
/// disable the delay.
pub fn delay_from_secs(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

/// Pick the exit executable: explicit flag, then `ETHDO_BIN`, then `ethdo`.
pub fn resolve_ethdo_bin(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    match std::env::var(ETHDO_BIN_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_ETHDO_BIN),
    }
}

//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::{
    delay_from_secs, resolve_ethdo_bin, ExitConfig, KeySourceConfig, PollConfig, RunConfig,
    DEFAULT_COMMAND_TIMEOUT, DEFAULT_CONNECTION, DEFAULT_ENV_FILE,
};

/// Submit voluntary exits for a batch of validators with ethdo
#[derive(Parser, Debug, Clone)]
#[command(name = "validator-exit", version)]
#[command(about = "Submit voluntary exits for a batch of validators with ethdo")]
#[command(group(ArgGroup::new("source").required(true).args(["file", "priv_keys_file"])))]
pub struct Args {
    /// Operators YAML file with validator public keys
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Text dump with one `privateKey: <hex>` line per validator
    #[arg(long, value_name = "PATH")]
    pub priv_keys_file: Option<PathBuf>,

    /// Only exit the keys of this operator
    #[arg(long, value_name = "NAME")]
    pub operator: Option<String>,

    /// Offline-preparation JSON mapping public keys to validator indices
    #[arg(long, value_name = "PATH")]
    pub offline_prep_file: Option<PathBuf>,

    /// Credentials file defining MNEMONIC
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Index of the first key to process (0-based)
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub start_index: usize,

    /// Maximum number of keys to process
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Skip keys until this public key is reached
    #[arg(long, value_name = "PUBKEY")]
    pub resume_from: Option<String>,

    /// Beacon node URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_CONNECTION)]
    pub connection: String,

    /// Timeout passed to ethdo
    #[arg(long, value_name = "DURATION", default_value = DEFAULT_COMMAND_TIMEOUT)]
    pub timeout: String,

    /// Do not poll validator status after submitting
    #[arg(long)]
    pub no_wait: bool,

    /// Seconds to wait between validators
    #[arg(long, value_name = "SECONDS", default_value_t = 1.0, allow_negative_numbers = true)]
    pub sleep: f64,

    /// ethdo executable [default: $ETHDO_BIN or `ethdo`]
    #[arg(long, value_name = "PATH")]
    pub ethdo_bin: Option<PathBuf>,
}

impl Args {
    /// Split the arguments into exit and run configuration.
    pub fn into_configs(self) -> (ExitConfig, RunConfig) {
        let exit = ExitConfig {
            connection: self.connection,
            command_timeout: self.timeout,
            ethdo_bin: resolve_ethdo_bin(self.ethdo_bin),
            key_delay: delay_from_secs(self.sleep),
            wait_for_status: !self.no_wait,
            poll: PollConfig::default(),
        };

        // The group guarantees exactly one source.
        let source = match (self.priv_keys_file, self.file) {
            (Some(path), _) => KeySourceConfig::PrivateKeys { path },
            (None, path) => KeySourceConfig::Operators {
                path: path.unwrap_or_default(),
                operator: self.operator,
            },
        };

        let run = RunConfig {
            source,
            index_file: self.offline_prep_file,
            credentials_file: self.env_file,
            start_index: self.start_index,
            limit: self.limit,
            resume_from: self.resume_from,
        };
        (exit, run)
    }
}

//! Driven Ports (SPI - Outbound Dependencies)
//!
//! - [`CommandRunner`]: runs the external exit command
//! - [`BeaconStatusApi`]: reads validator status from a beacon node
//! - [`KeyDeriver`]: optional private key → public key capability

use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Redactor, Secret, ValidatorStatus};

/// One external command invocation, as plain data.
///
/// Secret material lives only in `env` (mnemonic mode) or in an argument that
/// the caller registers with a [`Redactor`] (private-key mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Variables added to the inherited environment.
    pub env: Vec<(String, Secret)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: Secret) -> Self {
        self.env.push((key.into(), value));
        self
    }

    /// Printable command line with every secret replaced by the redaction
    /// marker. Environment values are always masked.
    pub fn describe(&self, redactor: &Redactor) -> String {
        let mut line = String::new();
        for (key, value) in &self.env {
            let _ = write!(line, "{key}={value} ");
        }
        line.push_str(&shell_quote(&self.program.to_string_lossy()));
        for arg in &self.args {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        redactor.redact(&line)
    }
}

fn shell_quote(word: &str) -> String {
    if !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,@%+".contains(c))
    {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Raw result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Stdout decoded permissively; invalid UTF-8 is replaced.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr decoded permissively; invalid UTF-8 is replaced.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Failure to run a command at all.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Error executing {program}: {source}")]
    Spawn { program: String, source: io::Error },
}

/// Runs external commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` to completion, capturing stdout and stderr.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError>;
}

/// Why a status query produced no status.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusQueryError {
    /// Request never got an HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Beacon node answered with a non-200 status
    #[error("Status code {0}")]
    UnexpectedStatus(u16),

    /// Body did not contain `data.status`
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Beacon node validator status lookup.
#[async_trait]
pub trait BeaconStatusApi: Send + Sync {
    /// Current status of `validator_id` (public key or index) at head.
    async fn validator_status(&self, validator_id: &str)
        -> Result<ValidatorStatus, StatusQueryError>;
}

/// Result of a public key derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// `0x`-prefixed compressed public key.
    Derived(String),
    /// No derivation capability in this build.
    Unavailable,
    /// The private key could not be used; the reason never contains it.
    Failed(String),
}

/// Private key → public key derivation.
pub trait KeyDeriver: Send + Sync {
    fn derive_pubkey(&self, private_key: &Secret) -> Derivation;
}

//! Exit submission through `ethdo validator exit`.
//!
//! In mnemonic mode the credentials file is only ever placed in the child
//! environment; a POSIX shell expands `$MNEMONIC` into the final argument, so
//! no argument built here contains the secret. In private-key mode the key has
//! to be an argument and is registered with the [`Redactor`] instead.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::ExitConfig;
use crate::domain::{ExitOutcome, Redactor, ValidatorReference};
use crate::loader::Credentials;
use crate::ports::{CommandRunner, Invocation};

/// Shell used to expand the mnemonic from the environment.
pub const SHELL: &str = "/bin/sh";

/// `$0` is the executable, `$1..$3` are connection, timeout and validator.
pub const MNEMONIC_SCRIPT: &str = r#"exec "$0" validator exit --connection="$1" --timeout="$2" --validator="$3" --mnemonic="$MNEMONIC""#;

/// Fallback detail when a failed command printed nothing.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Invocation could not be built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("No credentials loaded for mnemonic-based exit")]
    MissingCredentials,
}

/// Result of one submission. All text fields are already redacted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub outcome: ExitOutcome,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub command_line: String,
}

impl Submission {
    fn failed(command_line: String, reason: String) -> Self {
        Self {
            outcome: ExitOutcome::Failure,
            exit_code: None,
            stdout: String::new(),
            stderr: reason,
            command_line,
        }
    }

    /// Best single-line explanation: stderr, else stdout, else a placeholder.
    pub fn detail(&self) -> String {
        [self.stderr.trim(), self.stdout.trim()]
            .into_iter()
            .find(|text| !text.is_empty())
            .unwrap_or(UNKNOWN_ERROR)
            .to_string()
    }
}

/// Submits voluntary exits with a fixed endpoint, timeout and credentials.
pub struct ExitSubmitter<R> {
    runner: R,
    ethdo_bin: PathBuf,
    connection: String,
    timeout: String,
    credentials: Option<Credentials>,
    redactor: Redactor,
}

impl<R: CommandRunner> ExitSubmitter<R> {
    /// `credentials` is required for public key and index references.
    pub fn new(runner: R, config: &ExitConfig, credentials: Option<Credentials>) -> Self {
        let redactor = credentials
            .as_ref()
            .map(|credentials| Redactor::new(credentials.secrets()))
            .unwrap_or_default();
        Self {
            runner,
            ethdo_bin: config.ethdo_bin.clone(),
            connection: config.connection.clone(),
            timeout: config.command_timeout.clone(),
            credentials,
            redactor,
        }
    }

    /// Build the command for `reference`.
    pub fn invocation(&self, reference: &ValidatorReference) -> Result<Invocation, SubmitError> {
        if let Some(private_key) = reference.secret() {
            return Ok(Invocation::new(&self.ethdo_bin)
                .arg("validator")
                .arg("exit")
                .arg(format!("--connection={}", self.connection))
                .arg(format!("--timeout={}", self.timeout))
                .arg(format!("--private-key={}", private_key.expose())));
        }

        let credentials = self
            .credentials
            .as_ref()
            .ok_or(SubmitError::MissingCredentials)?;
        let invocation = Invocation::new(SHELL)
            .arg("-c")
            .arg(MNEMONIC_SCRIPT)
            .arg(self.ethdo_bin.to_string_lossy())
            .arg(self.connection.as_str())
            .arg(self.timeout.as_str())
            .arg(reference.argument());
        Ok(credentials
            .env()
            .iter()
            .fold(invocation, |invocation, (key, value)| {
                invocation.env(key.as_str(), value.clone())
            }))
    }

    /// Run one exit command and classify its result.
    ///
    /// Never fails: anything that prevents a clean run is a
    /// [`ExitOutcome::Failure`] with the reason in `stderr`.
    pub async fn submit(&self, reference: &ValidatorReference) -> Submission {
        let redactor = match reference.secret() {
            Some(secret) => self.redactor.clone().with(secret),
            None => self.redactor.clone(),
        };

        let invocation = match self.invocation(reference) {
            Ok(invocation) => invocation,
            Err(e) => return Submission::failed(String::new(), e.to_string()),
        };
        let command_line = invocation.describe(&redactor);
        info!("[submit] Executing: {}", command_line);

        match self.runner.run(&invocation).await {
            Ok(output) => {
                let stderr = output.stderr_text();
                let outcome = ExitOutcome::classify(output.exit_code, &stderr);
                let submission = Submission {
                    outcome,
                    exit_code: output.exit_code,
                    stdout: redactor.redact(&output.stdout_text()),
                    stderr: redactor.redact(&stderr),
                    command_line,
                };
                debug!(
                    "[submit] Exit code {:?}, outcome {}",
                    submission.exit_code, submission.outcome
                );
                if !submission.stderr.trim().is_empty() {
                    debug!("[submit] stderr: {}", submission.stderr.trim());
                }
                submission
            }
            Err(e) => Submission::failed(command_line, redactor.redact(&e.to_string())),
        }
    }
}

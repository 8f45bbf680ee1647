//! Process runner backed by `tokio::process`.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::ports::{CommandError, CommandOutput, CommandRunner, Invocation};

/// Runs invocations as child processes, capturing both output streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(
                invocation
                    .env
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.expose())),
            )
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                program: invocation.program.display().to_string(),
                source,
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::Secret;

    #[tokio::test]
    async fn test_captures_streams_and_exit_code() {
        let invocation = Invocation::new("/bin/sh")
            .arg("-c")
            .arg("echo out; echo err >&2; exit 3");
        let output = TokioCommandRunner::new().run(&invocation).await.unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout_text(), "out\n");
        assert_eq!(output.stderr_text(), "err\n");
    }

    #[tokio::test]
    async fn test_env_overlay_reaches_child() {
        let invocation = Invocation::new("/bin/sh")
            .arg("-c")
            .arg("printf %s \"$EXIT_TEST_VALUE\"")
            .env("EXIT_TEST_VALUE", Secret::new("from overlay"));
        let output = TokioCommandRunner::new().run(&invocation).await.unwrap();
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout_text(), "from overlay");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let invocation = Invocation::new("/nonexistent/ethdo-binary");
        let result = TokioCommandRunner::new().run(&invocation).await;
        assert!(matches!(result, Err(CommandError::Spawn { .. })));
    }
}

//! Process execution gateway
//!
//! Commands are argument vectors handed straight to the OS, never a shell
//! string, so ids and config values cannot inject shell syntax.

use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Deadline for the whole invocation
    pub timeout: Duration,
}

impl Invocation {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed while waiting for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("cancelled")]
    Cancelled,
}

/// Runs external commands
///
/// A non-zero exit is not an error at this level: it comes back as a
/// `ProcessOutput` with `success == false` so callers can inspect stderr.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    async fn exec(
        &self,
        invocation: &Invocation,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ExecError>;
}

/// Executor backed by `tokio::process`
///
/// The child is killed when its deadline passes or the token is cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioExecutor;

#[async_trait]
impl ProcessExecutor for TokioExecutor {
    async fn exec(
        &self,
        invocation: &Invocation,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ExecError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!("Running: {}", invocation);

        let child = cmd.spawn().map_err(|source| ExecError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        // Dropping the losing branch drops the child, which kills it.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExecError::Cancelled),
            waited = tokio::time::timeout(invocation.timeout, child.wait_with_output()) => {
                let output = waited
                    .map_err(|_| ExecError::Timeout(invocation.timeout))?
                    .map_err(ExecError::Wait)?;

                Ok(ProcessOutput {
                    status: output.status.code(),
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str, timeout: Duration) -> Invocation {
        Invocation::new("sh", timeout).arg("-c").arg(script)
    }

    #[test]
    fn test_invocation_display() {
        let invocation = Invocation::new("docker-compose", Duration::from_secs(1))
            .args(["-p", "cache1"])
            .arg("up");
        assert_eq!(invocation.to_string(), "docker-compose -p cache1 up");
    }

    #[tokio::test]
    async fn test_exec_captures_output_and_status() {
        let output = TokioExecutor
            .exec(
                &sh("echo out; echo err >&2; exit 3", Duration::from_secs(10)),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(output.status, Some(3));
        assert!(!output.success);
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[tokio::test]
    async fn test_exec_does_not_interpret_shell_syntax_in_args() {
        let invocation = Invocation::new("echo", Duration::from_secs(10)).arg("a; echo injected");
        let output = TokioExecutor
            .exec(&invocation, &CancellationToken::new())
            .await
            .unwrap();

        assert!(output.success);
        assert_eq!(output.stdout, "a; echo injected\n");
    }

    #[tokio::test]
    async fn test_exec_timeout() {
        let result = TokioExecutor
            .exec(
                &Invocation::new("sleep", Duration::from_millis(100)).arg("5"),
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(ExecError::Timeout(d)) if d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_exec_cancelled() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let result = TokioExecutor
            .exec(
                &Invocation::new("sleep", Duration::from_secs(30)).arg("5"),
                &cancel,
            )
            .await;

        assert!(matches!(result, Err(ExecError::Cancelled)));
    }

    #[tokio::test]
    async fn test_exec_missing_program() {
        let result = TokioExecutor
            .exec(
                &Invocation::new("stackyard-definitely-not-installed", Duration::from_secs(1)),
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(ExecError::Spawn { .. })));
    }
}

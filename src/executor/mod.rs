//! External command execution
//!
//! Runs the block-management CLI with an explicit argument vector (never
//! through a shell) and turns any failure into an [`ExecError`]. There are
//! no retries and no timeout: block operations are not safe to repeat
//! blindly, and a stuck CLI is left for the caller to deal with.

use futures_util::future::BoxFuture;
use std::process::Stdio;
use tokio::process::Command;

use crate::common::ExecError;

/// Runs an external program and returns its standard output
pub trait CommandRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<u8>, ExecError>>;
}

/// [`CommandRunner`] that spawns real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<u8>, ExecError>> {
        Box::pin(execute(program, args))
    }
}

/// Run `program` with `args` and capture its output.
///
/// Succeeds only on a zero exit status. The child is not killed when the
/// returned future is dropped; it runs to completion and its output is
/// discarded.
pub async fn execute(program: &str, args: &[String]) -> Result<Vec<u8>, ExecError> {
    tracing::debug!(program = %program, args = ?args, "Executing command");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            tracing::warn!(program = %program, error = %e, "Failed to spawn command");
            ExecError::spawn(e.to_string())
        })?;

    if output.status.success() {
        return Ok(output.stdout);
    }

    let code = output.status.code();
    let message = failure_message(code, &output.stdout, &output.stderr);
    tracing::warn!(
        program = %program,
        args = ?args,
        exit_status = ?code,
        error = %message,
        "Command failed"
    );
    Err(ExecError::nonzero_exit(code, message))
}

/// Pick the most useful description of a failed run: stderr, then stdout
/// (the CLI reports errors on stdout in JSON mode), then the status itself.
fn failure_message(code: Option<i32>, stdout: &[u8], stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    if !stderr.trim().is_empty() {
        return stderr.trim().to_string();
    }
    let stdout = String::from_utf8_lossy(stdout);
    if !stdout.trim().is_empty() {
        return stdout.trim().to_string();
    }
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_stderr() {
        assert_eq!(
            failure_message(Some(2), b"{\"RESULT\":\"FAIL\"}", b"  volume not found\n"),
            "volume not found"
        );
    }

    #[test]
    fn test_failure_message_falls_back_to_stdout() {
        assert_eq!(
            failure_message(Some(2), b"{\"RESULT\":\"FAIL\"}\n", b""),
            "{\"RESULT\":\"FAIL\"}"
        );
    }

    #[test]
    fn test_failure_message_without_output() {
        assert_eq!(failure_message(Some(3), b"", b" \n"), "exit status 3");
        assert_eq!(failure_message(None, b"", b""), "terminated by signal");
    }
}

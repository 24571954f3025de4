// Copyright 2025 Cowboy AI, LLC.

//! Shell subprocess invocation
//!
//! One shell invocation per run. Stdout is captured verbatim as the result;
//! a non-zero exit or any byte on the error stream fails the run. The
//! command line reaches the shell unescaped; see the marshalling docs on
//! `Implementation::command_line`. There is no timeout: a hung process
//! blocks dispatch until it exits.

use crate::errors::{EngineError, EngineResult};
use tokio::process::Command;
use tracing::debug;

/// Run `command_line` under `shell -c` and capture its output
///
/// Returns the raw stdout on success. Relative paths in the command line
/// resolve against the invoking process's own working directory.
pub async fn run_shell(shell: &str, command_line: &str) -> EngineResult<String> {
    debug!(shell, command = command_line, "spawning process");

    let output = Command::new(shell)
        .arg("-c")
        .arg(command_line)
        .output()
        .await
        .map_err(|e| EngineError::Process {
            command: command_line.to_string(),
            status: None,
            stdout: String::new(),
            stderr: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() || !stderr.is_empty() {
        return Err(EngineError::Process {
            command: command_line.to_string(),
            status: output.status.code(),
            stdout,
            stderr,
        });
    }

    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_SHELL;
    use pretty_assertions::assert_eq;

    /// Test stdout is captured verbatim, trailing newline included
    #[tokio::test]
    async fn test_stdout_captured_verbatim() {
        let out = run_shell(DEFAULT_SHELL, "echo abc").await.unwrap();
        assert_eq!(out, "abc\n");
    }

    /// Test `echo -n` leaves no trailing newline
    #[tokio::test]
    async fn test_no_trailing_newline() {
        let out = run_shell(DEFAULT_SHELL, "echo -n abc").await.unwrap();
        assert_eq!(out, "abc");
    }

    /// Test non-zero exit fails with captured streams
    #[tokio::test]
    async fn test_nonzero_exit_fails() {
        let err = run_shell(DEFAULT_SHELL, "exit 3").await.unwrap_err();
        match err {
            EngineError::Process { status, .. } => assert_eq!(status, Some(3)),
            other => panic!("expected process error, got {other}"),
        }
    }

    /// Test a non-empty error stream fails even on exit 0
    #[tokio::test]
    async fn test_stderr_fails_even_on_success_exit() {
        let err = run_shell(DEFAULT_SHELL, "echo oops 1>&2; exit 0")
            .await
            .unwrap_err();
        match err {
            EngineError::Process { status, stderr, .. } => {
                assert_eq!(status, Some(0));
                assert_eq!(stderr, "oops\n");
            }
            other => panic!("expected process error, got {other}"),
        }
    }

    /// Test an unspawnable shell surfaces as a process error
    #[tokio::test]
    async fn test_spawn_failure() {
        let err = run_shell("/definitely/not/a/shell", "true").await.unwrap_err();
        assert!(err.is_process_error());
    }
}

//! Subprocess execution for git
//!
//! Arguments are always passed as an argument vector, never through a shell.
//! Success is decided by exit status alone; stderr is kept only for display.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// Captured result of a git invocation that is allowed to fail
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Whether git exited with status 0
    pub success: bool,
    /// Stdout, lossily decoded
    pub stdout: String,
    /// Stderr, lossily decoded
    pub stderr: String,
}

impl GitOutput {
    /// Stdout split into lines, without trailing empty lines
    pub fn lines(&self) -> Vec<String> {
        self.stdout.lines().map(ToString::to_string).collect()
    }
}

impl From<Output> for GitOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Create a git command rooted at `workdir` with prompts disabled
pub(crate) fn git_command(workdir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(workdir);
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    cmd
}

/// Run git and capture its output regardless of exit status
///
/// Only a failure to spawn git at all is an error here.
pub fn run_git_output(workdir: &Path, args: &[&str]) -> Result<GitOutput> {
    debug!(command = %format_command(args), "running git");
    let output: GitOutput = git_command(workdir).args(args).output()?.into();
    debug!(success = output.success, "git finished");
    Ok(output)
}

/// Run git, returning stdout lines on success
///
/// A non-zero exit becomes [`Error::Command`] carrying `error_msg`.
pub fn run_git(workdir: &Path, args: &[&str], error_msg: &str) -> Result<Vec<String>> {
    let output = run_git_output(workdir, args)?;
    if output.success {
        Ok(output.lines())
    } else {
        Err(Error::Command {
            message: error_msg.to_string(),
            command: format_command(args),
            stderr: output.stderr.trim().to_string(),
        })
    }
}

/// Reject refs that git would parse as options
pub fn check_ref(reference: &str) -> Result<&str> {
    if reference.is_empty() || reference.starts_with('-') {
        return Err(Error::InvalidRef(reference.to_string()));
    }
    Ok(reference)
}

fn format_command(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::{PublishError, Result};
use crate::git::VcsQuery;

/// Runs queries through the `git` executable
pub struct GitCommand {
    program: PathBuf,
    working_dir: Option<PathBuf>,
}

impl GitCommand {
    /// Use `git` from `PATH`
    pub fn new() -> Self {
        GitCommand {
            program: PathBuf::from("git"),
            working_dir: None,
        }
    }

    /// Use a specific executable, e.g. a pinned git in CI images
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        GitCommand {
            program: program.into(),
            working_dir: None,
        }
    }

    /// Run every query from `dir`
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsQuery for GitCommand {
    fn query(&self, args: &[String]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| {
            PublishError::vcs(format!(
                "failed to run {}: {}",
                self.program.display(),
                e
            ))
        })?;

        // Non-zero exit (no such ref, no remote) is an ordinary "not found".
        if !output.status.success() {
            debug!(
                code = output.status.code().unwrap_or(-1),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git {} exited unsuccessfully",
                args.join(" ")
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

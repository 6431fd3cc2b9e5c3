//! Version-control query port
//!
//! The decision logic never runs git itself. It issues argument lists
//! through the [VcsQuery] trait and parses whatever text comes back, so it
//! can be exercised without a real repository.
//!
//! # Overview
//!
//! - [command::GitCommand]: spawns the `git` executable
//! - [mock::MockVcs]: scripted answers that record every query, for tests
//! - [repository::discover_git_dir]: locates the git directory with `git2`
//!
//! ```rust
//! # use publish_planner::git::{MockVcs, VcsQuery};
//! let vcs = MockVcs::new().with_response("log", "HEAD&main");
//! let out = vcs.query(&["log".to_string(), "-1".to_string()]).unwrap();
//! assert_eq!(out, "HEAD&main");
//! ```

pub mod command;
pub mod mock;
pub mod repository;

pub use command::GitCommand;
pub use mock::MockVcs;
pub use repository::discover_git_dir;

use crate::error::Result;

/// Raw text query against the version-control tool
///
/// ## Error Handling
///
/// A command that runs but finds nothing (unknown ref, no remote, detached
/// HEAD) must yield `Ok` with empty or partial output; empty output is a
/// valid "not found" answer. `Err` is reserved for failing to run the tool
/// at all, and callers degrade it to the same "not found" path.
pub trait VcsQuery {
    /// Run the tool with `args` and return its trimmed standard output.
    fn query(&self, args: &[String]) -> Result<String>;
}

impl<T: VcsQuery + ?Sized> VcsQuery for &T {
    fn query(&self, args: &[String]) -> Result<String> {
        (**self).query(args)
    }
}

/// Tokens of the custom `%(decorate:...)` pretty format.
///
/// With empty prefix/suffix the decoration of a commit on `main` tracked by
/// `origin/main` and tagged `v1.0.0` reads `HEAD&main#origin/main#tag: v1.0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationFormat {
    pub prefix: String,
    pub suffix: String,
    pub separator: String,
    pub pointer: String,
}

impl Default for DecorationFormat {
    fn default() -> Self {
        DecorationFormat {
            prefix: String::new(),
            suffix: String::new(),
            separator: "#".to_string(),
            pointer: "&".to_string(),
        }
    }
}

impl DecorationFormat {
    /// The `--pretty=` argument producing this format.
    pub fn pretty_arg(&self) -> String {
        format!(
            "--pretty=%(decorate:prefix={},suffix={},separator={},pointer={})",
            self.prefix, self.suffix, self.separator, self.pointer
        )
    }
}

/// Builds `--git-dir=<dir>` for queries that must target a specific repository.
pub fn git_dir_arg(git_dir: &str) -> String {
    format!("--git-dir={}", git_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_arg() {
        assert_eq!(
            DecorationFormat::default().pretty_arg(),
            "--pretty=%(decorate:prefix=,suffix=,separator=#,pointer=&)"
        );
    }

    #[test]
    fn test_git_dir_arg() {
        assert_eq!(git_dir_arg("./.git"), "--git-dir=./.git");
    }
}

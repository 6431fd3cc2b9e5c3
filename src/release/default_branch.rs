use std::cell::OnceCell;

use regex::Regex;
use tracing::{debug, info};

use crate::config::CiConfig;
use crate::git::{git_dir_arg, VcsQuery};
use crate::properties::PropertySource;

/// Determines the repository's canonical main branch
///
/// Resolution order, each step only tried when the previous found nothing:
/// 1. `git symbolic-ref refs/remotes/<remote>/HEAD`
/// 2. the `HEAD branch:` line of `git remote show <remote>`
/// 3. CI variables: the default-branch variables in order, then the
///    branch-name variable when the primary-branch flag is exactly `"true"`
///
/// `None` means the caller should fall back to `main`/`master`.
pub struct DefaultBranchDetector<'a> {
    vcs: &'a dyn VcsQuery,
    env: &'a dyn PropertySource,
    git_dir: String,
    remote: String,
    ci: CiConfig,
    detected: OnceCell<Option<String>>,
}

impl<'a> DefaultBranchDetector<'a> {
    pub fn new(
        vcs: &'a dyn VcsQuery,
        env: &'a dyn PropertySource,
        git_dir: impl Into<String>,
        remote: impl Into<String>,
        ci: CiConfig,
    ) -> Self {
        DefaultBranchDetector {
            vcs,
            env,
            git_dir: git_dir.into(),
            remote: remote.into(),
            ci,
            detected: OnceCell::new(),
        }
    }

    /// Default branch name, computed on first call only
    pub fn detect(&self) -> Option<&str> {
        self.detected
            .get_or_init(|| {
                let detected = self
                    .from_symbolic_ref()
                    .or_else(|| self.from_remote_show())
                    .or_else(|| self.from_environment());
                match &detected {
                    Some(name) => info!(default_branch = %name, "Detected default branch"),
                    None => info!("Default branch could not be detected"),
                }
                detected
            })
            .as_deref()
    }

    fn run(&self, args: Vec<String>) -> String {
        self.vcs.query(&args).unwrap_or_else(|e| {
            debug!("Default branch query failed: {}", e);
            String::new()
        })
    }

    fn from_symbolic_ref(&self) -> Option<String> {
        let output = self.run(vec![
            git_dir_arg(&self.git_dir),
            "symbolic-ref".to_string(),
            format!("refs/remotes/{}/HEAD", self.remote),
        ]);
        let branch = parse_symbolic_ref(&output, &self.remote);
        debug!(found = branch.is_some(), "Checked remote HEAD symbolic ref");
        branch
    }

    fn from_remote_show(&self) -> Option<String> {
        let output = self.run(vec![
            git_dir_arg(&self.git_dir),
            "remote".to_string(),
            "show".to_string(),
            self.remote.clone(),
        ]);
        let branch = parse_remote_show(&output);
        debug!(found = branch.is_some(), "Checked remote metadata");
        branch
    }

    fn from_environment(&self) -> Option<String> {
        for var in &self.ci.default_branch_vars {
            if let Some(value) = non_empty(self.env.get(var)) {
                debug!(variable = %var, "Default branch taken from CI variable");
                return Some(value);
            }
        }

        let is_primary = self.env.get(&self.ci.primary_branch_flag_var);
        if is_primary.as_deref() == Some("true") {
            if let Some(value) = non_empty(self.env.get(&self.ci.branch_name_var)) {
                debug!(
                    variable = %self.ci.branch_name_var,
                    "Default branch taken from primary-branch CI variables"
                );
                return Some(value);
            }
        }

        None
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `refs/remotes/<remote>/<name>` -> `<name>`
pub fn parse_symbolic_ref(output: &str, remote: &str) -> Option<String> {
    let prefix = format!("refs/remotes/{}/", remote);
    output
        .trim()
        .strip_prefix(prefix.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Extracts `<name>` from a `HEAD branch: <name>` line.
///
/// git prints `HEAD branch: (unknown)` when the remote HEAD is ambiguous;
/// that counts as not found.
pub fn parse_remote_show(output: &str) -> Option<String> {
    let re = Regex::new(r"HEAD branch: (\S+)").ok()?;
    let name = re.captures(output)?.get(1)?.as_str();

    if name.starts_with('(') {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockVcs;
    use crate::properties::MapProperties;

    fn detector<'a>(vcs: &'a MockVcs, env: &'a MapProperties) -> DefaultBranchDetector<'a> {
        DefaultBranchDetector::new(vcs, env, "./.git", "origin", CiConfig::default())
    }

    #[test]
    fn test_parse_symbolic_ref() {
        assert_eq!(
            parse_symbolic_ref("refs/remotes/origin/main\n", "origin"),
            Some("main".to_string())
        );
        assert_eq!(
            parse_symbolic_ref("refs/remotes/origin/release/next", "origin"),
            Some("release/next".to_string())
        );
        assert_eq!(parse_symbolic_ref("", "origin"), None);
        assert_eq!(parse_symbolic_ref("refs/remotes/upstream/main", "origin"), None);
    }

    #[test]
    fn test_parse_remote_show() {
        let output = "* remote origin\n  Fetch URL: git@example.com:acme/app.git\n  HEAD branch: trunk\n  Remote branches:\n";
        assert_eq!(parse_remote_show(output), Some("trunk".to_string()));
        assert_eq!(parse_remote_show("  HEAD branch: (unknown)"), None);
        assert_eq!(parse_remote_show("fatal: 'origin' does not appear to be a git repository"), None);
    }

    #[test]
    fn test_symbolic_ref_wins() {
        let vcs = MockVcs::new()
            .with_response("symbolic-ref", "refs/remotes/origin/main")
            .with_response("remote", "HEAD branch: other");
        let env = MapProperties::new();

        assert_eq!(detector(&vcs, &env).detect(), Some("main"));
        assert_eq!(vcs.count_calls("remote"), 0);
    }

    #[test]
    fn test_remote_show_fallback() {
        let vcs = MockVcs::new().with_response("remote", "  HEAD branch: develop");
        let env = MapProperties::new().with("CI_DEFAULT_BRANCH", "main");

        assert_eq!(detector(&vcs, &env).detect(), Some("develop"));
    }

    #[test]
    fn test_environment_default_branch() {
        let vcs = MockVcs::new();
        let env = MapProperties::new().with("CI_DEFAULT_BRANCH", "trunk");

        assert_eq!(detector(&vcs, &env).detect(), Some("trunk"));
    }

    #[test]
    fn test_primary_flag_must_be_literal_true() {
        let vcs = MockVcs::new();
        let env = MapProperties::new()
            .with("CI_IS_DEFAULT_BRANCH", "yes")
            .with("CI_COMMIT_BRANCH", "main");
        assert_eq!(detector(&vcs, &env).detect(), None);

        let env = MapProperties::new()
            .with("CI_IS_DEFAULT_BRANCH", "true")
            .with("CI_COMMIT_BRANCH", "main");
        assert_eq!(detector(&vcs, &env).detect(), Some("main"));
    }

    #[test]
    fn test_nothing_found() {
        let vcs = MockVcs::new()
            .with_error("symbolic-ref", "boom")
            .with_error("remote", "boom");
        let env = MapProperties::new();

        assert_eq!(detector(&vcs, &env).detect(), None);
    }

    #[test]
    fn test_detect_is_memoized() {
        let vcs = MockVcs::new();
        let env = MapProperties::new();
        let detector = detector(&vcs, &env);

        detector.detect();
        detector.detect();
        assert_eq!(vcs.count_calls("symbolic-ref"), 1);
        assert_eq!(vcs.count_calls("remote"), 1);
    }
}

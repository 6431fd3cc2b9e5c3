use std::cell::OnceCell;

use tracing::{debug, info, warn};

use crate::domain::branch::{BranchState, DETACHED_HEAD};
use crate::git::{git_dir_arg, DecorationFormat, VcsQuery};

/// Marker git puts in front of tag decorations
const TAG_MARKER: &str = "tag: ";

/// How many commits back to look for a branch decoration (tip, then parent)
const LOOKBACK: usize = 2;

/// Resolves the current branch from decorated history
///
/// The tip commit is tried first, then its parent (merge commits and shallow
/// checkouts often leave the tip undecorated). When neither carries a
/// branch the result is the detached `HEAD` sentinel. The answer is computed
/// once per resolver.
pub struct BranchResolver<'a> {
    vcs: &'a dyn VcsQuery,
    git_dir: String,
    remote: String,
    format: DecorationFormat,
    resolved: OnceCell<BranchState>,
}

impl<'a> BranchResolver<'a> {
    pub fn new(vcs: &'a dyn VcsQuery, git_dir: impl Into<String>, remote: impl Into<String>) -> Self {
        BranchResolver {
            vcs,
            git_dir: git_dir.into(),
            remote: remote.into(),
            format: DecorationFormat::default(),
            resolved: OnceCell::new(),
        }
    }

    /// Skip VCS detection and report `branch` as-is
    pub fn with_branch(self, branch: impl Into<String>) -> Self {
        let state = BranchState::new(branch);
        let _ = self.resolved.set(state);
        self
    }

    /// Current branch; queries the VCS on first call only
    pub fn resolve(&self) -> &BranchState {
        self.resolved.get_or_init(|| {
            let state = match (0..LOOKBACK).find_map(|offset| self.branch_for_revision(offset)) {
                Some(name) => BranchState::new(name),
                None => {
                    warn!("No branch decoration found on the last {} commits, assuming detached HEAD", LOOKBACK);
                    BranchState::detached()
                }
            };
            info!(branch = %state.name, detached = state.is_detached, "Resolved current branch");
            state
        })
    }

    fn branch_for_revision(&self, offset: usize) -> Option<String> {
        let args = vec![
            git_dir_arg(&self.git_dir),
            "log".to_string(),
            "-1".to_string(),
            format!("--skip={}", offset),
            self.format.pretty_arg(),
        ];

        let output = match self.vcs.query(&args) {
            Ok(output) => output,
            Err(e) => {
                debug!("Decoration query for revision -{} failed: {}", offset, e);
                return None;
            }
        };

        let branch = extract_branch_name(&output, &self.format, &self.remote);
        debug!(
            offset,
            decoration = %output,
            branch = branch.as_deref().unwrap_or("<none>"),
            "Parsed commit decoration"
        );
        branch
    }
}

/// Pull the first branch name out of a decoration string.
///
/// Only the part after the pointer token is considered when the token is
/// present. Tag refs, empty segments and `HEAD` are ignored and the remote
/// prefix (`origin/`) is stripped.
///
/// ```
/// # use publish_planner::git::DecorationFormat;
/// # use publish_planner::release::branch_resolver::extract_branch_name;
/// let format = DecorationFormat::default();
/// assert_eq!(extract_branch_name("HEAD&origin/main", &format, "origin"), Some("main".to_string()));
/// assert_eq!(extract_branch_name("tag: v1.0.0", &format, "origin"), None);
/// ```
pub fn extract_branch_name(output: &str, format: &DecorationFormat, remote: &str) -> Option<String> {
    let line = output.lines().next().unwrap_or("").trim();

    let refs = match line.split_once(format.pointer.as_str()) {
        Some((_, after)) if !format.pointer.is_empty() => after,
        _ => line,
    };

    let remote_prefix = format!("{}/", remote);

    refs.split(format.separator.as_str())
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter(|segment| *segment != DETACHED_HEAD)
        .filter(|segment| !segment.starts_with(TAG_MARKER))
        .map(|segment| segment.strip_prefix(remote_prefix.as_str()).unwrap_or(segment))
        // `origin/HEAD` strips down to the sentinel itself
        .find(|name| !name.is_empty() && *name != DETACHED_HEAD)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockVcs;

    fn parse(output: &str) -> Option<String> {
        extract_branch_name(output, &DecorationFormat::default(), "origin")
    }

    #[test]
    fn test_pointer_with_remote_branch() {
        assert_eq!(parse("HEAD&origin/main"), Some("main".to_string()));
    }

    #[test]
    fn test_local_and_remote_branches() {
        assert_eq!(
            parse("HEAD&feature/login#origin/feature/login"),
            Some("feature/login".to_string())
        );
    }

    #[test]
    fn test_without_pointer() {
        assert_eq!(parse("origin/develop#tag: v1.2.0"), Some("develop".to_string()));
    }

    #[test]
    fn test_tags_only() {
        assert_eq!(parse("tag: v1.0.0#tag: latest"), None);
        assert_eq!(parse("HEAD&tag: v1.0.0"), None);
    }

    #[test]
    fn test_detached_and_empty() {
        assert_eq!(parse("HEAD"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("##"), None);
    }

    #[test]
    fn test_remote_head_is_ignored() {
        assert_eq!(parse("origin/HEAD#origin/main"), Some("main".to_string()));
    }

    #[test]
    fn test_other_remote_prefix_is_kept() {
        assert_eq!(
            extract_branch_name("upstream/main", &DecorationFormat::default(), "origin"),
            Some("upstream/main".to_string())
        );
        assert_eq!(
            extract_branch_name("upstream/main", &DecorationFormat::default(), "upstream"),
            Some("main".to_string())
        );
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let raw = "HEAD&release/2.0.0#origin/release/2.0.0#tag: v2.0.0";
        assert_eq!(parse(raw), parse(raw));
        assert_eq!(parse(raw), Some("release/2.0.0".to_string()));
    }

    #[test]
    fn test_resolve_current_commit() {
        let vcs = MockVcs::new().with_decoration(0, "HEAD&main#origin/main");
        let resolver = BranchResolver::new(&vcs, "./.git", "origin");

        assert_eq!(resolver.resolve().name, "main");
        assert_eq!(vcs.count_calls("log"), 1);
    }

    #[test]
    fn test_resolve_falls_back_to_previous_commit() {
        let vcs = MockVcs::new()
            .with_decoration(0, "tag: v1.0.0")
            .with_decoration(1, "origin/develop");
        let resolver = BranchResolver::new(&vcs, "./.git", "origin");

        assert_eq!(resolver.resolve(), &BranchState::new("develop"));
        assert_eq!(vcs.count_calls("log"), 2);
    }

    #[test]
    fn test_resolve_detached_when_nothing_found() {
        let vcs = MockVcs::new().with_decoration(0, "HEAD");
        let resolver = BranchResolver::new(&vcs, "./.git", "origin");

        assert!(resolver.resolve().is_detached);
        assert_eq!(resolver.resolve().name, "HEAD");
    }

    #[test]
    fn test_resolve_tolerates_query_errors() {
        let vcs = MockVcs::new().with_error("log", "git not installed");
        let resolver = BranchResolver::new(&vcs, "./.git", "origin");

        assert!(resolver.resolve().is_detached);
    }

    #[test]
    fn test_resolve_is_memoized() {
        let vcs = MockVcs::new().with_decoration(0, "HEAD&main");
        let resolver = BranchResolver::new(&vcs, "./.git", "origin");

        resolver.resolve();
        resolver.resolve();
        assert_eq!(vcs.count_calls("log"), 1);
    }

    #[test]
    fn test_explicit_branch_skips_vcs() {
        let vcs = MockVcs::new();
        let resolver = BranchResolver::new(&vcs, "./.git", "origin").with_branch("hotfix/1");

        assert_eq!(resolver.resolve().name, "hotfix/1");
        assert!(vcs.calls().is_empty());
    }

    #[test]
    fn test_query_shape() {
        let vcs = MockVcs::new().with_decoration(0, "HEAD&main");
        BranchResolver::new(&vcs, "/work/.git", "origin").resolve();

        assert_eq!(
            vcs.calls()[0],
            vec![
                "--git-dir=/work/.git".to_string(),
                "log".to_string(),
                "-1".to_string(),
                "--skip=0".to_string(),
                "--pretty=%(decorate:prefix=,suffix=,separator=#,pointer=&)".to_string(),
            ]
        );
    }
}

use serde::Serialize;
use std::fmt;

use crate::domain::branch::escape_branch;

/// Suffix marking a mutable, overwritable version
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// Final version decision for one build
///
/// `resolved_version == base_version` exactly when `is_release` is set;
/// otherwise it is the snapshot form produced by [`snapshot_version`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDecision {
    pub base_version: String,
    pub is_release: bool,
    pub resolved_version: String,
}

impl VersionDecision {
    /// Derive the decision from the base version, branch and release flag
    pub fn new(base_version: impl Into<String>, branch: &str, is_release: bool) -> Self {
        let base_version = base_version.into();
        let resolved_version = if is_release {
            base_version.clone()
        } else {
            snapshot_version(&base_version, branch)
        };

        VersionDecision {
            base_version,
            is_release,
            resolved_version,
        }
    }
}

impl fmt::Display for VersionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resolved_version)
    }
}

/// `<base>-<escaped branch>-SNAPSHOT`
///
/// # Example
/// ```
/// # use publish_planner::domain::version::snapshot_version;
/// assert_eq!(snapshot_version("1.2.3", "feature/x"), "1.2.3-feature-x-SNAPSHOT");
/// ```
pub fn snapshot_version(base_version: &str, branch: &str) -> String {
    format!(
        "{}-{}-{}",
        base_version,
        escape_branch(branch),
        SNAPSHOT_SUFFIX
    )
}

/// Whether `version` parses as a semantic version.
///
/// Only used to warn; any string is accepted as a base version.
pub fn is_semver(version: &str) -> bool {
    semver::Version::parse(version).is_ok()
}

use serde::Serialize;

/// Branch name reported when no branch can be resolved
pub const DETACHED_HEAD: &str = "HEAD";

/// Branch names treated as the main line when nothing better is known
pub const FALLBACK_MAIN_BRANCHES: [&str; 2] = ["main", "master"];

/// The branch the current build runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchState {
    pub name: String,
    pub is_detached: bool,
}

impl BranchState {
    /// Create a branch state; the `HEAD` sentinel marks a detached head
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let is_detached = name == DETACHED_HEAD;

        BranchState { name, is_detached }
    }

    /// Detached head sentinel
    pub fn detached() -> Self {
        BranchState::new(DETACHED_HEAD)
    }
}

/// Replace every `/` in a branch name with `-`
pub fn escape_branch(branch: &str) -> String {
    branch.replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_branch() {
        let branch = BranchState::new("develop");
        assert!(!branch.is_detached);
        assert_eq!(branch.name, "develop");
    }

    #[test]
    fn test_detached_head() {
        let branch = BranchState::detached();
        assert!(branch.is_detached);
        assert_eq!(branch.name, "HEAD");
        assert_eq!(branch, BranchState::new(DETACHED_HEAD));
    }

    #[test]
    fn test_escape_branch() {
        assert_eq!(escape_branch("feature/team/login"), "feature-team-login");
        assert_eq!(escape_branch("main"), "main");
    }
}

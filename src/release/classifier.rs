use regex::Regex;
use tracing::debug;

use crate::domain::branch::{DETACHED_HEAD, FALLBACK_MAIN_BRANCHES};
use crate::error::Result;
use crate::release::default_branch::DefaultBranchDetector;

/// Decides whether a branch produces release builds
///
/// Configured patterns take priority: when any are present the branch must
/// fully match one of them and default-branch detection is never consulted.
/// With no patterns, a detached head is never a release and any other branch
/// is a release when it is the detected default branch (or, failing
/// detection, `main`/`master`).
pub struct ReleaseClassifier<'a> {
    patterns: Vec<Regex>,
    detector: DefaultBranchDetector<'a>,
}

impl<'a> ReleaseClassifier<'a> {
    /// Compile `patterns` with full-match semantics.
    ///
    /// # Returns
    /// * `Err(PublishError::Pattern)` - if any pattern is not a valid regex
    pub fn new(patterns: &[String], detector: DefaultBranchDetector<'a>) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&format!("^(?:{})$", p)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ReleaseClassifier { patterns, detector })
    }

    pub fn is_release(&self, branch: &str) -> bool {
        if !self.patterns.is_empty() {
            let matched = self.patterns.iter().find(|re| re.is_match(branch));
            debug!(
                branch,
                pattern = matched.map(|re| re.as_str()).unwrap_or("<none>"),
                "Classified branch by release patterns"
            );
            return matched.is_some();
        }

        if branch == DETACHED_HEAD {
            debug!("Detached HEAD is never a release");
            return false;
        }

        match self.detector.detect() {
            Some(default_branch) => default_branch == branch,
            None => {
                debug!("Falling back to {:?} as release branches", FALLBACK_MAIN_BRANCHES);
                FALLBACK_MAIN_BRANCHES.contains(&branch)
            }
        }
    }
}

use std::cell::OnceCell;

use tracing::{info, warn};

use crate::domain::version::{is_semver, VersionDecision};
use crate::domain::BranchState;
use crate::release::branch_resolver::BranchResolver;
use crate::release::classifier::ReleaseClassifier;

/// Computes the artifact version for the current build
///
/// Branch resolution and release classification run once, on the first
/// call to any accessor; later calls reuse the stored decision.
pub struct VersionResolver<'a> {
    base_version: String,
    alter_version: bool,
    branch: BranchResolver<'a>,
    classifier: ReleaseClassifier<'a>,
    decision: OnceCell<VersionDecision>,
}

impl<'a> VersionResolver<'a> {
    pub fn new(
        base_version: impl Into<String>,
        alter_version: bool,
        branch: BranchResolver<'a>,
        classifier: ReleaseClassifier<'a>,
    ) -> Self {
        VersionResolver {
            base_version: base_version.into(),
            alter_version,
            branch,
            classifier,
            decision: OnceCell::new(),
        }
    }

    pub fn decision(&self) -> &VersionDecision {
        self.decision.get_or_init(|| {
            if !is_semver(&self.base_version) {
                warn!(base_version = %self.base_version, "Base version is not a semantic version");
            }

            let branch = self.branch.resolve();
            let is_release = self.classifier.is_release(&branch.name);
            let decision = VersionDecision::new(self.base_version.clone(), &branch.name, is_release);

            info!(
                version = %decision.resolved_version,
                release = decision.is_release,
                "Resolved artifact version"
            );
            decision
        })
    }

    /// Branch the decision was based on
    pub fn branch(&self) -> &BranchState {
        self.branch.resolve()
    }

    pub fn is_release(&self) -> bool {
        self.decision().is_release
    }

    /// Base version for releases, `<base>-<branch>-SNAPSHOT` otherwise
    pub fn version(&self) -> &str {
        &self.decision().resolved_version
    }

    /// Version the rest of the build should see.
    ///
    /// Equals [`version`](Self::version) when version altering is enabled,
    /// otherwise the untouched base version.
    pub fn version_for_project(&self) -> &str {
        if self.alter_version {
            self.version()
        } else {
            &self.base_version
        }
    }
}

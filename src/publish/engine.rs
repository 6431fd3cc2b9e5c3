use tracing::{debug, info, warn};

use crate::boundary::DecisionWarning;
use crate::config::PluginConfiguration;
use crate::domain::version::is_semver;
use crate::domain::{ArtifactCoordinate, BranchState, VersionDecision};
use crate::error::{PublishError, Result};
use crate::git::repository::conventional_git_dir;
use crate::git::{discover_git_dir, VcsQuery};
use crate::properties::PropertySource;
use crate::publish::credentials::{resolve_credentials, Credentials};
use crate::publish::probe::{ArtifactProbe, ProbeOutcome, PublishabilityChecker};
use crate::publish::strategy::{tier_name, Strategy, StrategyKind};
use crate::release::{BranchResolver, DefaultBranchDetector, ReleaseClassifier, VersionResolver};

/// Everything the build needs to wire up publication
///
/// Produced once per [`PublishDecisionEngine::plan`] call and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishPlan {
    pub repository_url: String,
    pub credentials: Credentials,
    pub should_publish: bool,
    pub should_sign: bool,
    pub routing_command: Option<String>,
    pub strategy: StrategyKind,
    pub branch: BranchState,
    pub version: VersionDecision,
    /// Version the rest of the build sees (`alter_project_version`)
    pub project_version: String,
    pub artifact: ArtifactCoordinate,
    pub warnings: Vec<DecisionWarning>,
}

/// Orchestrates one publish decision
///
/// Each `plan` call builds fresh resolvers, so memoized answers never leak
/// between invocations. Within one call the VCS is asked each question at
/// most once and the artifact repository is probed at most once.
pub struct PublishDecisionEngine<'a> {
    vcs: &'a dyn VcsQuery,
    properties: &'a dyn PropertySource,
    probe: &'a dyn ArtifactProbe,
    branch_override: Option<String>,
    git_dir: Option<String>,
}

impl<'a> PublishDecisionEngine<'a> {
    pub fn new(
        vcs: &'a dyn VcsQuery,
        properties: &'a dyn PropertySource,
        probe: &'a dyn ArtifactProbe,
    ) -> Self {
        PublishDecisionEngine {
            vcs,
            properties,
            probe,
            branch_override: None,
            git_dir: None,
        }
    }

    /// Use `branch` instead of reading it from decorated history
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch_override = Some(branch.into());
        self
    }

    /// Use `git_dir` as-is instead of discovering it from `git_folder`
    pub fn with_git_dir(mut self, git_dir: impl Into<String>) -> Self {
        self.git_dir = Some(git_dir.into());
        self
    }

    /// Build the publish plan for `config`.
    ///
    /// # Returns
    /// * `Err(PublishError::Config)` - missing project coordinates, or a
    ///   target that cannot be turned into a strategy
    /// * `Err(PublishError::Pattern)` - an invalid release branch pattern
    pub fn plan(&self, config: &PluginConfiguration) -> Result<PublishPlan> {
        let (group, name) = project_coordinates(config)?;
        let git_dir = self.resolve_git_dir(config);

        let mut branch = BranchResolver::new(self.vcs, git_dir.clone(), config.remote.clone());
        if let Some(name) = &self.branch_override {
            debug!(branch = %name, "Using branch override");
            branch = branch.with_branch(name.clone());
        }
        let detector = DefaultBranchDetector::new(
            self.vcs,
            self.properties,
            git_dir,
            config.remote.clone(),
            config.ci.clone(),
        );
        let classifier = ReleaseClassifier::new(&config.release_branch_patterns, detector)?;
        let resolver = VersionResolver::new(
            config.project.version.clone(),
            config.alter_project_version,
            branch,
            classifier,
        );

        let decision = resolver.decision().clone();
        let branch = resolver.branch().clone();
        let project_version = resolver.version_for_project().to_string();
        let is_release = decision.is_release;

        let mut warnings = Vec::new();
        if branch.is_detached {
            warnings.push(DecisionWarning::DetachedHead);
        }
        if !is_semver(&decision.base_version) {
            warnings.push(DecisionWarning::NonSemverBaseVersion {
                version: decision.base_version.clone(),
            });
        }

        let strategy = Strategy::select(config, is_release)?;
        let tier = config.target_for(is_release);
        let credentials = resolve_credentials(tier, config, self.properties);
        if strategy.kind() != StrategyKind::Local && !credentials.is_complete() {
            warn!(
                tier = tier_name(is_release),
                target = %tier.target,
                "Credentials incomplete for remote target"
            );
            warnings.push(DecisionWarning::CredentialsMissing {
                tier: tier_name(is_release).to_string(),
                target: tier.target.clone(),
            });
        }

        let artifact = ArtifactCoordinate::new(group, name, decision.resolved_version.clone());
        let checker =
            PublishabilityChecker::new(self.probe, credentials.clone(), config.probe.on_failure);
        let assessment = strategy.assess(&artifact, is_release, &checker);
        if let Some((uri, outcome @ ProbeOutcome::Failed(reason))) = &assessment.probe {
            warnings.push(DecisionWarning::ProbeFailed {
                uri: uri.clone(),
                reason: reason.clone(),
                assumed_published: checker.interpret(outcome),
            });
        }

        info!(
            artifact = %artifact,
            strategy = %strategy.kind(),
            publish = assessment.publishable,
            sign = strategy.should_sign(),
            "Publish plan ready"
        );

        Ok(PublishPlan {
            repository_url: strategy.repository_url(),
            credentials,
            should_publish: assessment.publishable,
            should_sign: strategy.should_sign(),
            routing_command: strategy.routing_command().map(str::to_string),
            strategy: strategy.kind(),
            branch,
            version: decision,
            project_version,
            artifact,
            warnings,
        })
    }

    fn resolve_git_dir(&self, config: &PluginConfiguration) -> String {
        if let Some(git_dir) = &self.git_dir {
            return git_dir.clone();
        }

        match discover_git_dir(&config.git_folder) {
            Ok(git_dir) => {
                debug!(git_dir = %git_dir, "Discovered git directory");
                git_dir
            }
            Err(e) => {
                let fallback = conventional_git_dir(&config.git_folder);
                debug!(error = %e, git_dir = %fallback, "Git directory discovery failed, using fallback");
                fallback
            }
        }
    }
}

fn project_coordinates(config: &PluginConfiguration) -> Result<(String, String)> {
    let group = config.project.group.trim();
    let name = config.project.name.trim();

    if group.is_empty() {
        return Err(PublishError::config(
            "project.group must name the artifact group (e.g. 'org.acme')",
        ));
    }
    if name.is_empty() {
        return Err(PublishError::config(
            "project.name must name the artifact id",
        ));
    }

    Ok((group.to_string(), name.to_string()))
}

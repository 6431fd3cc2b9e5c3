//! Main workflow orchestration logic
//!
//! Separates CLI argument parsing from the planning itself so the workflow
//! can be driven programmatically (and in tests) without clap.

use std::time::Duration;

use tracing::debug;

use crate::config::{load_config, PluginConfiguration};
use crate::error::Result;
use crate::git::{GitCommand, VcsQuery};
use crate::properties::{LayeredProperties, MapProperties, ProcessEnv, PropertySource};
use crate::publish::{ArtifactProbe, HttpProbe, PublishDecisionEngine, PublishPlan};

/// Arguments for the planning workflow
///
/// Mirrors the CLI Args without depending on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanWorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// Branch to plan for instead of the one detected from history
    pub branch: Option<String>,

    /// Overrides `project.version`
    pub base_version: Option<String>,

    /// Overrides `project.group`
    pub group: Option<String>,

    /// Overrides `project.name`
    pub artifact: Option<String>,

    /// `KEY=VALUE` pairs layered over the process environment
    pub properties: Vec<String>,
}

/// Apply command-line overrides to a loaded configuration.
pub fn apply_overrides(mut config: PluginConfiguration, args: &PlanWorkflowArgs) -> PluginConfiguration {
    if let Some(version) = &args.base_version {
        config.project.version = version.clone();
    }
    if let Some(group) = &args.group {
        config.project.group = group.clone();
    }
    if let Some(artifact) = &args.artifact {
        config.project.name = artifact.clone();
    }
    config
}

/// Main planning workflow
///
/// 1. Load configuration and apply overrides
/// 2. Layer `-P` properties over the process environment
/// 3. Run the decision engine against `git` and the artifact repository
pub fn run_plan_workflow(args: &PlanWorkflowArgs) -> Result<PublishPlan> {
    let config = apply_overrides(load_config(args.config_path.as_deref())?, args);
    debug!(git_folder = %config.git_folder, remote = %config.remote, "Configuration loaded");

    let properties = LayeredProperties::new(MapProperties::from_pairs(&args.properties)?, ProcessEnv);
    let vcs = GitCommand::new();
    let probe = HttpProbe::new(Duration::from_secs(config.probe.timeout_secs))?;

    plan_with(&config, args.branch.as_deref(), &vcs, &properties, &probe)
}

/// Run the engine with explicit adapters.
pub fn plan_with(
    config: &PluginConfiguration,
    branch: Option<&str>,
    vcs: &dyn VcsQuery,
    properties: &dyn PropertySource,
    probe: &dyn ArtifactProbe,
) -> Result<PublishPlan> {
    let mut engine = PublishDecisionEngine::new(vcs, properties, probe);
    if let Some(branch) = branch {
        engine = engine.with_branch(branch);
    }
    engine.plan(config)
}

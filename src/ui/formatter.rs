//! Pure formatting functions for plan output.
//!
//! Every renderer returns a `String`; printing happens in the parent module.
//! Neither username nor password reaches any renderer output, only whether
//! credentials exist.

use console::style;
use serde::Serialize;

use crate::boundary::DecisionWarning;
use crate::error::{PublishError, Result};
use crate::publish::PublishPlan;

/// Flattened, secret-free view of a plan used by the machine formats
#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    version: &'a str,
    project_version: &'a str,
    base_version: &'a str,
    is_release: bool,
    branch: &'a str,
    detached: bool,
    strategy: String,
    repository_url: &'a str,
    should_publish: bool,
    should_sign: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    routing_command: Option<&'a str>,
    credentials_present: bool,
    artifact: String,
    warnings: Vec<String>,
}

impl<'a> PlanReport<'a> {
    fn from_plan(plan: &'a PublishPlan) -> Self {
        PlanReport {
            version: &plan.version.resolved_version,
            project_version: &plan.project_version,
            base_version: &plan.version.base_version,
            is_release: plan.version.is_release,
            branch: &plan.branch.name,
            detached: plan.branch.is_detached,
            strategy: plan.strategy.to_string(),
            repository_url: &plan.repository_url,
            should_publish: plan.should_publish,
            should_sign: plan.should_sign,
            routing_command: plan.routing_command.as_deref(),
            credentials_present: plan.credentials.is_complete(),
            artifact: plan.artifact.to_string(),
            warnings: plan.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Multi-line, styled summary for a terminal.
pub fn format_plan_human(plan: &PublishPlan) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", style("Publish plan").bold().underlined()));
    out.push_str(&format!("  Artifact:   {}\n", style(&plan.artifact).cyan()));

    let branch = if plan.branch.is_detached {
        format!("{} (detached)", plan.branch.name)
    } else {
        plan.branch.name.clone()
    };
    out.push_str(&format!("  Branch:     {}\n", branch));

    let kind = if plan.version.is_release {
        style("release").green()
    } else {
        style("snapshot").yellow()
    };
    out.push_str(&format!(
        "  Version:    {} ({})\n",
        plan.version.resolved_version, kind
    ));
    if plan.project_version != plan.version.resolved_version {
        out.push_str(&format!("  Project:    {}\n", plan.project_version));
    }

    out.push_str(&format!("  Strategy:   {}\n", plan.strategy));
    out.push_str(&format!("  Repository: {}\n", plan.repository_url));
    if let Some(command) = &plan.routing_command {
        out.push_str(&format!("  Command:    {}\n", command));
    }

    let credentials = if plan.credentials.is_complete() {
        "set"
    } else if plan.credentials.username.is_some() || plan.credentials.password.is_some() {
        "incomplete"
    } else {
        "anonymous"
    };
    out.push_str(&format!("  Login:      {}\n", credentials));
    out.push_str(&format!("  Sign:       {}\n", yes_no(plan.should_sign)));

    let publish = if plan.should_publish {
        style("yes").green().bold()
    } else {
        style("no, already published").red().bold()
    };
    out.push_str(&format!("  Publish:    {}\n", publish));

    out
}

/// Plan as a TOML document.
pub fn format_plan_toml(plan: &PublishPlan) -> Result<String> {
    toml::to_string(&PlanReport::from_plan(plan))
        .map_err(|e| PublishError::config(format!("cannot render plan as TOML: {}", e)))
}

/// Plan as `KEY=VALUE` lines for CI shells (`PUBLISH_` prefix).
pub fn format_plan_env(plan: &PublishPlan) -> String {
    let report = PlanReport::from_plan(plan);
    let mut lines = vec![
        env_line("VERSION", report.version),
        env_line("PROJECT_VERSION", report.project_version),
        env_line("BASE_VERSION", report.base_version),
        env_line("IS_RELEASE", &report.is_release.to_string()),
        env_line("BRANCH", report.branch),
        env_line("STRATEGY", &report.strategy),
        env_line("REPOSITORY_URL", report.repository_url),
        env_line("SHOULD_PUBLISH", &report.should_publish.to_string()),
        env_line("SHOULD_SIGN", &report.should_sign.to_string()),
        env_line("CREDENTIALS_PRESENT", &report.credentials_present.to_string()),
        env_line("ARTIFACT", &report.artifact),
    ];
    if let Some(command) = report.routing_command {
        lines.push(env_line("ROUTING_COMMAND", command));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Single styled warning line.
pub fn format_warning(warning: &DecisionWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), warning)
}

fn env_line(key: &str, value: &str) -> String {
    format!("PUBLISH_{}={}", key, shell_quote(value))
}

/// Single-quote values that a POSIX shell would otherwise split or expand.
fn shell_quote(value: &str) -> String {
    let safe = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:@+%".contains(c));
    if safe && !value.is_empty() {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

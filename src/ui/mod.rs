//! User interface module - printing of plans, warnings and errors.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing to stdout/stderr in the requested format

use std::str::FromStr;

use console::style;

use crate::boundary::DecisionWarning;
use crate::error::{PublishError, Result};
use crate::publish::PublishPlan;

pub mod formatter;

pub use formatter::{format_plan_env, format_plan_human, format_plan_toml, format_warning};

/// How the plan is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Toml,
    Env,
}

impl FromStr for OutputFormat {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "toml" => Ok(OutputFormat::Toml),
            "env" => Ok(OutputFormat::Env),
            other => Err(PublishError::config(format!(
                "unknown output format '{}', expected human, toml or env",
                other
            ))),
        }
    }
}

/// Render the plan in `format`.
pub fn render_plan(plan: &PublishPlan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(format_plan_human(plan)),
        OutputFormat::Toml => format_plan_toml(plan),
        OutputFormat::Env => Ok(format_plan_env(plan)),
    }
}

/// Print the plan to stdout; warnings go to stderr so machine formats stay parseable.
pub fn display_plan(plan: &PublishPlan, format: OutputFormat) -> Result<()> {
    display_warnings(&plan.warnings);
    print!("{}", render_plan(plan, format)?);
    Ok(())
}

pub fn display_warnings(warnings: &[DecisionWarning]) {
    for warning in warnings {
        eprintln!("{}", format_warning(warning));
    }
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("human".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert_eq!("TOML".parse::<OutputFormat>().unwrap(), OutputFormat::Toml);
        assert_eq!("env".parse::<OutputFormat>().unwrap(), OutputFormat::Env);
        assert!("json".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use publish_planner::cli::{run_plan_workflow, PlanWorkflowArgs};
use publish_planner::ui::{self, OutputFormat};

#[derive(clap::Parser)]
#[command(
    name = "publish-planner",
    about = "Decide version, target repository and signing for a CI publish"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Plan for this branch instead of detecting it from git")]
    branch: Option<String>,

    #[arg(long, help = "Override the base version (project.version)")]
    base_version: Option<String>,

    #[arg(long, help = "Override the artifact group (project.group)")]
    group: Option<String>,

    #[arg(long, help = "Override the artifact id (project.name)")]
    artifact: Option<String>,

    #[arg(
        short = 'P',
        long = "property",
        value_name = "KEY=VALUE",
        help = "Property consulted before the environment (repeatable)"
    )]
    properties: Vec<String>,

    #[arg(
        short,
        long,
        default_value = "human",
        help = "Output format: human, toml or env"
    )]
    format: String,

    #[arg(short, long, help = "Log decision details to stderr")]
    verbose: bool,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("publish-planner {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let format: OutputFormat = args.format.parse()?;

    let workflow_args = PlanWorkflowArgs {
        config_path: args.config,
        branch: args.branch,
        base_version: args.base_version,
        group: args.group,
        artifact: args.artifact,
        properties: args.properties,
    };

    let plan = run_plan_workflow(&workflow_args).context("Failed to build publish plan")?;
    ui::display_plan(&plan, format)?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "publish_planner=debug"
    } else {
        "publish_planner=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

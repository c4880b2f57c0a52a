//! Render Cloud - command-line host for the Render node and trigger
//!
//! Main entry point for the `rendercloud` CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, resources, run, trigger, verify};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Render Cloud - manage Render services and receive Render webhooks
#[derive(Parser)]
#[command(name = "rendercloud")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Render API base URL (default: https://api.render.com/v1)
    #[arg(long, global = true, env = "RENDER_API_URL")]
    pub api_url: Option<String>,

    /// Config directory (default: ~/.config/rendercloud)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List resources and operations, or print the node description
    Resources(resources::ResourcesArgs),

    /// Execute a resource operation
    Run(run::RunArgs),

    /// Check that the API key is accepted
    Verify(verify::VerifyArgs),

    /// Manage the webhook subscription and receive deliveries
    Trigger(trigger::TriggerArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
        api_url: cli.api_url,
        config_dir: cli.config_dir,
    };

    // Console (human-readable, stderr) + rotating JSON file
    let filter = if ctx.verbose {
        "rendercloud=debug,rendercloud_client=debug,rendercloud_node=debug,rendercloud_webhook=debug,rendercloud_config=debug,info"
    } else {
        "rendercloud=info,rendercloud_client=info,rendercloud_node=info,rendercloud_webhook=info,warn"
    };

    let log_dir = ctx
        .config_dir()
        .map(|d| rendercloud_config::log_dir(&d))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "rendercloud.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "rendercloud=trace,rendercloud_client=trace,rendercloud_node=trace,rendercloud_webhook=trace,rendercloud_config=trace,info",
                )),
        )
        .init();

    match cli.command {
        Commands::Resources(args) => resources::run(args, &ctx).await,
        Commands::Run(args) => run::run(args, &ctx).await,
        Commands::Verify(args) => verify::run(args, &ctx).await,
        Commands::Trigger(args) => trigger::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}

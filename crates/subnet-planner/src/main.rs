//! Subnet Planner CLI
//!
//! Usage:
//!   subnet-planner <subcommand> [options]
//!
//! Available subcommands:
//!   info     - Range, netmask and counts of a CIDR
//!   divide   - Split a CIDR into equal subnets
//!   parent   - Block one prefix bit shorter
//!   sibling  - Other half of the parent block
//!   suggest  - Block sizing for one tenant
//!   plan     - Size a tenant snapshot and lay out pools
//!   usage    - Pool occupancy from child pools and blocks

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use subnet_planner::PlannerConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match cli.config {
        Some(ref path) => PlannerConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PlannerConfig::default(),
    };

    // Verbosity flags win over the configured level
    let filter = match cli.verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli.command.execute(&config, cli.format)
}

//! Subnet planner CLI structure

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use subnet_planner::PoolStrategy;

/// Subnet planner - CIDR math and tenant capacity planning
#[derive(Parser)]
#[command(name = "subnet-planner")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the range, netmask and address counts of a CIDR
    Info {
        /// CIDR, e.g. 10.0.0.0/24 or 2001:db8::/48
        cidr: String,
    },

    /// Split a CIDR into equal subnets
    Divide {
        cidr: String,

        /// Prefix length of each subnet
        prefix: u8,
    },

    /// Show the block one prefix bit shorter
    Parent { cidr: String },

    /// Show the other half of the parent block
    Sibling { cidr: String },

    /// Suggest a block for one tenant
    Suggest(SuggestArgs),

    /// Size every tenant in a snapshot file and lay out pools
    Plan {
        /// Snapshot file (TOML)
        file: PathBuf,

        /// Override the snapshot's pool strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Show how much of a pool is used by child pools and blocks
    Usage {
        /// Pool CIDR
        pool: String,

        /// Child pool CIDR (repeatable)
        #[arg(long = "child")]
        children: Vec<String>,

        /// Address count of a block in the pool (repeatable)
        #[arg(long = "block")]
        blocks: Vec<String>,
    },
}

/// Arguments for sizing a single tenant
#[derive(Args)]
pub struct SuggestArgs {
    /// Number of subnets
    #[arg(short, long, default_value = "1")]
    pub networks: u64,

    /// Hosts per subnet
    #[arg(long, default_value = "8")]
    pub hosts: u64,

    /// Growth headroom in percent
    #[arg(short, long, default_value = "0")]
    pub growth: f64,

    /// Size for IPv6 instead of IPv4
    #[arg(long)]
    pub ipv6: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StrategyArg {
    Even,
    Demand,
}

impl From<StrategyArg> for PoolStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Even => PoolStrategy::Even,
            StrategyArg::Demand => PoolStrategy::Demand,
        }
    }
}

//! CLI parse: clap types for stackstate. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stackstate CLI - cluster stack version rollout state
#[derive(Parser)]
#[command(name = "stackstate")]
#[command(about = "Query stack version rollout state across cluster nodes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Disable colored text output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show stack versions of a cluster with nodes bucketed by state
    Versions {
        /// Cluster name
        #[arg(long)]
        cluster: String,

        /// Stack version id (repeat for several; omit to list all of the cluster)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Comma-separated fields to emit (default: all)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Keep only versions matching field=value or field!=value (repeatable, all must hold)
        #[arg(long = "where")]
        filters: Vec<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Load catalog, cluster version and node records from a JSON snapshot
    Import {
        /// Snapshot file
        file: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

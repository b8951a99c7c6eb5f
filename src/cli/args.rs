//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// d6bridge - school data from D6 for assistant tool calls
///
/// Resolves every request from the cache, D6 v2, D6 v1 or synthetic data,
/// whichever answers first.
#[derive(Parser, Debug)]
#[command(name = "d6bridge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "D6BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a tool call and print the result as JSON
    Call(CallArgs),

    /// List available tools
    Tools(ToolsArgs),

    /// Report resolver health
    Status(StatusArgs),

    /// Re-probe D6 availability
    Probe(ProbeArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Inspect or clear the response cache
    Cache(CacheArgs),
}

#[derive(Parser, Debug)]
pub struct CallArgs {
    /// Tool name, e.g. get_learners
    pub tool: String,

    /// Tool parameters as a JSON object
    #[arg(short, long)]
    pub params: Option<String>,

    /// Skip the cache tier
    #[arg(long)]
    pub live: bool,
}

#[derive(Parser, Debug)]
pub struct ToolsArgs {
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Print the health snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Print the probe report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration (password masked)
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.backend)
        key: String,
        /// Value to set
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON tool catalogue
    Json,
    /// Names only, one per line
    Plain,
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show backend, entry count and counters
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Remove cached responses
    Clear {
        /// Only keys starting with this prefix (e.g. d6:lookup:)
        #[arg(long)]
        prefix: Option<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

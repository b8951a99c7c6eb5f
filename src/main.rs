//! d6bridge CLI entry point

use clap::Parser;
use console::style;
use d6bridge::cli::{Cli, Commands};
use d6bridge::config::{Config, ConfigManager};
use d6bridge::error::BridgeResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("d6bridge=warn"),
        1 => EnvFilter::new("d6bridge=info"),
        _ => EnvFilter::new("d6bridge=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

async fn run() -> BridgeResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // Tool listing works without a readable config
    if let Commands::Tools(args) = cli.command {
        return d6bridge::cli::commands::tools(args).await;
    }

    let config = manager.load_effective().await?;
    init_tracing(cli.verbose, &config);
    debug!(
        "Loaded config from {} (mode {})",
        manager.path().display(),
        config.mode()
    );

    match cli.command {
        Commands::Tools(_) => unreachable!("Tools handled above"),
        Commands::Call(args) => d6bridge::cli::commands::call(args, &config).await,
        Commands::Status(args) => d6bridge::cli::commands::status(args, &config).await,
        Commands::Probe(args) => d6bridge::cli::commands::probe(args, &config).await,
        Commands::Config(args) => d6bridge::cli::commands::config(args, &manager, &config).await,
        Commands::Cache(args) => d6bridge::cli::commands::cache(args, &config).await,
    }
}

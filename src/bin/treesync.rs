//! Treesync CLI Binary
//!
//! Command-line interface for mirroring a remote catalog into a local
//! directory tree.

use clap::Parser;
use std::process;
use tracing::{error, info};
use treesync::cli::{run, Cli};
use treesync::config::SyncConfig;
use treesync::logging::{init_logging, LoggingConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Treesync starting");

    if let Err(e) = run(&cli).await {
        error!("Command failed: {}", e);
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// Build logging configuration from the config file's verbosity shorthand,
/// overridden by CLI arguments.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = LoggingConfig::default();

    if let Ok(raw) = std::fs::read_to_string(&cli.config) {
        if let Ok(parsed) = serde_yaml::from_str::<SyncConfig>(&raw) {
            config.level = parsed.verbosity.level().to_string();
        }
    }

    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}

//! CLI surface: clap types, command dispatch, and presentation.
//! Domain work lives in the library modules; this file only wires them up.

use crate::catalog::{assemble_tree, filter_files, CatalogClient};
use crate::config::{load_config, SyncConfig, UpdateMode};
use crate::diff;
use crate::error::SyncError;
use crate::healthcheck::health_check;
use crate::materialize;
use crate::snapshot;
use crate::tree::builder::LocalTreeBuilder;
use crate::tree::node::Tree;
use crate::tree::{path, visit};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Treesync CLI - Mirror a remote catalog into a local directory
#[derive(Parser)]
#[command(name = "treesync")]
#[command(about = "Mirror a remote course catalog into a local directory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, default_value = "./treesync.yaml")]
    pub config: PathBuf,

    /// Answer yes to every prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log file path (logs go to stderr when unset)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter configuration file
    Template {
        /// Destination path (defaults to the --config path)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Diff the catalog against the local state and fetch what is missing
    Sync {
        /// Diff against the newest snapshot instead of walking the disk
        #[arg(long)]
        against_snapshot: bool,
        /// Report what would be fetched without touching disk or network
        #[arg(long)]
        dry_run: bool,
    },
    /// List stored snapshots
    Snapshots,
}

/// Execute the parsed command.
pub async fn run(cli: &Cli) -> Result<(), SyncError> {
    match &cli.command {
        Commands::Template { path, force } => {
            let dest = path.as_deref().unwrap_or(&cli.config);
            template(dest, *force)
        }
        Commands::Sync {
            against_snapshot,
            dry_run,
        } => {
            let config = load_config(&cli.config)?;
            sync(&config, !cli.yes, *against_snapshot, *dry_run).await
        }
        Commands::Snapshots => {
            let config = load_config_relaxed(&cli.config)?;
            snapshots(&config)
        }
    }
}

fn template(dest: &Path, force: bool) -> Result<(), SyncError> {
    if dest.exists() && !force {
        return Err(SyncError::ConfigError(format!(
            "{} already exists (use --force to overwrite)",
            dest.display()
        )));
    }
    let config = SyncConfig {
        auth: Some(crate::config::Auth {
            token: String::new(),
            url: String::new(),
        }),
        ..SyncConfig::default()
    };
    std::fs::write(dest, config.to_yaml()?)
        .map_err(|e| SyncError::ConfigError(format!("{}: {}", dest.display(), e)))?;
    println!(
        "{} {}",
        "Template written to".green(),
        dest.display().to_string().bold()
    );
    println!("Fill in the auth block (or set TREESYNC_TOKEN) before running `treesync sync`.");
    Ok(())
}

async fn sync(
    config: &SyncConfig,
    interactive: bool,
    against_snapshot: bool,
    dry_run: bool,
) -> Result<(), SyncError> {
    if !health_check(config, interactive)? {
        println!("{}", "Aborted.".yellow());
        return Ok(());
    }

    let auth = config
        .auth
        .as_ref()
        .ok_or_else(|| SyncError::ConfigError("no authentication information".to_string()))?;
    let client = CatalogClient::new(&auth.url, &auth.token)?;

    let root_name = path::canonicalize_path(&config.base_dir)?
        .to_string_lossy()
        .to_string();

    let (folders, files) = futures::join!(client.list_folders(), client.list_files());
    let folders = folders?;
    let files = filter_files(config, files?);
    info!(
        folders = folders.len(),
        files = files.len(),
        "Catalog listing fetched"
    );

    let source = assemble_tree(&root_name, &folders, &files);

    let merged = match config.update {
        UpdateMode::Overwrite => {
            info!("Overwrite mode: materializing the full catalog");
            visit::visit(&source, |_, node| node.set_tag(true))
        }
        UpdateMode::NewFileOnly => {
            let destination = destination_tree(config, against_snapshot)?;
            diff::diff(&source, &destination)
        }
    };

    snapshot::write_snapshot(&config.snapshot_dir, &merged)?;

    let plan = materialize::apply_size_limits(
        materialize::plan(&merged),
        config.max_file_size_bytes()?,
        config.max_total_size_bytes()?,
    );

    if plan.is_empty() {
        println!("{}", "Already up to date.".green());
        return Ok(());
    }

    if dry_run {
        println!(
            "{} {} directories, {} files",
            "Would materialize:".bold(),
            plan.directories.len(),
            plan.files.len()
        );
        for item in &plan.files {
            println!("  {}", item.path);
        }
        return Ok(());
    }

    let report = materialize::materialize(&plan, &client).await?;
    println!(
        "{} {} directories created, {} files fetched",
        "Sync complete:".green().bold(),
        report.directories_created,
        report.files_fetched
    );
    for (path, reason) in &report.failures {
        println!("  {} {}: {}", "failed".red(), path, reason);
    }
    Ok(())
}

/// The tree the catalog is compared against: the last snapshot when asked
/// for and present, the walked base directory otherwise.
fn destination_tree(config: &SyncConfig, against_snapshot: bool) -> Result<Tree, SyncError> {
    if against_snapshot {
        if let Some(tree) = snapshot::load_newest_snapshot(&config.snapshot_dir)? {
            return Ok(tree);
        }
        info!("No snapshot available, walking the base directory instead");
    }
    Ok(LocalTreeBuilder::new(config.base_dir.clone()).build()?)
}

fn snapshots(config: &SyncConfig) -> Result<(), SyncError> {
    let listing = snapshot::list_snapshots(&config.snapshot_dir)?;
    if listing.is_empty() {
        println!("No snapshots in {}", config.snapshot_dir.display());
        return Ok(());
    }
    let newest = listing.len() - 1;
    for (i, path) in listing.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if i == newest {
            println!("{} {}", name.bold(), "(newest)".green());
        } else {
            println!("{}", name);
        }
    }
    Ok(())
}

/// Parse the config file without requiring auth; commands that never talk
/// to the catalog only need the directory settings.
fn load_config_relaxed(path: &Path) -> Result<SyncConfig, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_yaml::from_str(&raw)
            .map_err(|e| SyncError::ConfigError(format!("{}: {}", path.display(), e))),
        Err(_) => Ok(SyncConfig::default()),
    }
}

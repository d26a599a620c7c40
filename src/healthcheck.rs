//! Pre-sync health check
//!
//! Validates the loaded config before any catalog traffic: directories
//! exist (or get created), size limits parse and are consistent, and in
//! interactive mode the user confirms the effective settings.

use crate::config::SyncConfig;
use crate::error::SyncError;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Run all checks, prompting where `interactive` allows it
///
/// Returns `Ok(false)` when the user declines a prompt; the caller should
/// abort the run without treating it as an error.
pub fn health_check(config: &SyncConfig, interactive: bool) -> Result<bool, SyncError> {
    if !ensure_directory(&config.base_dir, "base", interactive)? {
        return Ok(false);
    }
    if !ensure_directory(&config.snapshot_dir, "snapshot", interactive)? {
        return Ok(false);
    }
    if !check_size_limits(config, interactive)? {
        return Ok(false);
    }

    if interactive {
        println!("{}", "Effective configuration:".bold());
        println!("{}", config.to_yaml()?);
        let proceed = Confirm::new()
            .with_prompt("Proceed with these settings?")
            .default(true)
            .interact()
            .map_err(|e| SyncError::ConfigError(e.to_string()))?;
        if !proceed {
            info!("Run cancelled at confirmation prompt");
            return Ok(false);
        }
    }

    info!("Health check passed");
    Ok(true)
}

fn ensure_directory(dir: &Path, label: &str, interactive: bool) -> Result<bool, SyncError> {
    if dir.is_dir() {
        return Ok(true);
    }
    if dir.exists() {
        return Err(SyncError::ConfigError(format!(
            "{} directory {} exists but is not a directory",
            label,
            dir.display()
        )));
    }

    if interactive {
        let create = Confirm::new()
            .with_prompt(format!(
                "{} directory {} does not exist. Create it?",
                label,
                dir.display()
            ))
            .default(true)
            .interact()
            .map_err(|e| SyncError::ConfigError(e.to_string()))?;
        if !create {
            return Ok(false);
        }
    }

    fs::create_dir_all(dir).map_err(|e| {
        SyncError::ConfigError(format!(
            "failed to create {} directory {}: {}",
            label,
            dir.display(),
            e
        ))
    })?;
    info!(dir = %dir.display(), "Created {} directory", label);
    Ok(true)
}

/// Both limits must parse; a per-file limit above the total limit can never
/// admit a file the total would reject, but it usually signals a typo.
fn check_size_limits(config: &SyncConfig, interactive: bool) -> Result<bool, SyncError> {
    let per_file = config.max_file_size_bytes()?;
    let total = config.max_total_size_bytes()?;
    if let (Some(per_file), Some(total)) = (per_file, total) {
        if per_file > total {
            warn!(
                max_file_size = per_file,
                max_total_size = total,
                "Per-file size limit exceeds the total limit"
            );
            if interactive {
                let proceed = Confirm::new()
                    .with_prompt(
                        "max_file_size is larger than max_total_size; the total \
                         limit wins. Continue anyway?",
                    )
                    .default(true)
                    .interact()
                    .map_err(|e| SyncError::ConfigError(e.to_string()))?;
                return Ok(proceed);
            }
        }
    }
    Ok(true)
}

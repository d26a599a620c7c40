//! Configuration system
//!
//! One YAML file drives a sync run: catalog authentication, base and
//! snapshot directories, update mode, size limits and file filters. Every
//! field except authentication has a default, so a minimal config is just
//! the auth block. The bearer token may come from the environment instead
//! of the file.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file's auth token
pub const TOKEN_ENV: &str = "TREESYNC_TOKEN";

/// Catalog authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auth {
    /// API bearer token
    #[serde(default)]
    pub token: String,
    /// Catalog API base URL
    pub url: String,
}

/// Update strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateMode {
    /// Only materialize entities missing from the base directory
    #[default]
    NewFileOnly,
    /// Materialize the full catalog, overwriting same-named files
    Overwrite,
}

/// Logging verbosity shorthand for the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Verbosity {
    Mute,
    #[default]
    Verbose,
    Vverbose,
}

impl Verbosity {
    /// Tracing level filter string for this verbosity.
    pub fn level(self) -> &'static str {
        match self {
            Verbosity::Mute => "off",
            Verbosity::Verbose => "info",
            Verbosity::Vverbose => "debug",
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Catalog authentication; required for sync, absent in fresh templates
    pub auth: Option<Auth>,

    /// Directory mirrored catalog files land in
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Directory snapshots are stored in
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,

    #[serde(default)]
    pub update: UpdateMode,

    #[serde(default)]
    pub verbosity: Verbosity,

    /// Per-file size limit, e.g. "100mb" (default: unlimited)
    #[serde(default)]
    pub max_file_size: Option<String>,

    /// Total download size limit, e.g. "2gb" (default: unlimited)
    #[serde(default)]
    pub max_total_size: Option<String>,

    #[serde(default)]
    pub allow_video: bool,

    #[serde(default)]
    pub allow_link: bool,

    /// Filenames always downloaded, regardless of other rules
    #[serde(default)]
    pub file_white_list: Vec<String>,

    /// Filenames never downloaded
    #[serde(default)]
    pub file_black_list: Vec<String>,

    /// Mime classes always accepted
    #[serde(default)]
    pub file_extension_white_list: Vec<String>,

    /// Mime classes rejected unless whitelisted
    #[serde(default)]
    pub file_extension_black_list: Vec<String>,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("./.snapshot")
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auth: None,
            base_dir: default_base_dir(),
            snapshot_dir: default_snapshot_dir(),
            update: UpdateMode::default(),
            verbosity: Verbosity::default(),
            max_file_size: None,
            max_total_size: None,
            allow_video: false,
            allow_link: false,
            file_white_list: Vec::new(),
            file_black_list: Vec::new(),
            file_extension_white_list: Vec::new(),
            file_extension_black_list: Vec::new(),
        }
    }
}

impl SyncConfig {
    /// Per-file size limit in bytes, if configured.
    pub fn max_file_size_bytes(&self) -> Result<Option<u64>, SyncError> {
        self.max_file_size.as_deref().map(parse_size).transpose()
    }

    /// Total size limit in bytes, if configured.
    pub fn max_total_size_bytes(&self) -> Result<Option<u64>, SyncError> {
        self.max_total_size.as_deref().map(parse_size).transpose()
    }

    /// Serialize back to YAML (template generation, confirmation echo).
    pub fn to_yaml(&self) -> Result<String, SyncError> {
        serde_yaml::to_string(self).map_err(|e| SyncError::ConfigError(e.to_string()))
    }
}

/// Load and validate a config file
///
/// The auth token falls back to the `TREESYNC_TOKEN` environment variable
/// when the file leaves it empty. A missing or token-less auth block is a
/// configuration error; everything else has defaults.
pub fn load_config(path: &Path) -> Result<SyncConfig, SyncError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|_| SyncError::ConfigNotFound(path.to_path_buf()))?;

    let mut config: SyncConfig = serde_yaml::from_str(&raw)
        .map_err(|e| SyncError::ConfigError(format!("{}: {}", path.display(), e)))?;

    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.is_empty() {
            if let Some(auth) = config.auth.as_mut() {
                auth.token = token;
            }
        }
    }

    match &config.auth {
        Some(auth) if !auth.token.is_empty() && !auth.url.is_empty() => Ok(config),
        Some(_) => Err(SyncError::ConfigError(
            "auth block is missing a token or url".to_string(),
        )),
        None => Err(SyncError::ConfigError(
            "no authentication information in config".to_string(),
        )),
    }
}

/// Parse a human size string ("500kb", "20mb", "2gb", or plain bytes).
pub fn parse_size(size: &str) -> Result<u64, SyncError> {
    let size = size.trim().to_lowercase();
    if let Ok(bytes) = size.parse::<u64>() {
        return Ok(bytes);
    }
    // strip_suffix stays on char boundaries, so arbitrary (multi-byte)
    // input fails cleanly instead of slicing mid-character
    let (value, factor) = if let Some(value) = size.strip_suffix("kb") {
        (value, 1024u64)
    } else if let Some(value) = size.strip_suffix("mb") {
        (value, 1024 * 1024)
    } else if let Some(value) = size.strip_suffix("gb") {
        (value, 1024 * 1024 * 1024)
    } else {
        return Err(SyncError::ConfigError(format!(
            "invalid size unit in {:?}",
            size
        )));
    };
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| SyncError::ConfigError(format!("invalid size value in {:?}", size)))?;
    Ok((value * factor as f64) as u64)
}

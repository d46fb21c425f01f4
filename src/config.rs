//! Application configuration.
//!
//! Handles loading, validating, and merging `config.toml`. User files are
//! sparse: stock defaults are serialized to a TOML table and the user file is
//! merged on top, so a file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [processing]
//! workers = 4               # Row-band workers per operation
//!
//! [resize]
//! min = 1                   # Smallest accepted target width/height
//! max = 3000                # Largest accepted target width/height
//!
//! [save]
//! directory = "~/Pictures"  # Where saved images go ("~" = home directory)
//! extension = "jpg"         # Output format
//! quality = 90              # JPEG quality (1-100)
//! min_name_len = 3
//! max_name_len = 100
//!
//! [input]
//! extensions = ["jpg"]      # Accepted input file extensions
//!
//! [log]
//! path = "app.txt"          # Append-only audit log
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::RowBandScheduler;
use crate::imaging::codec::{output_format, supported_input_extensions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Name of the config file looked up in a directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Application configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Accepted resize targets.
    pub resize: ResizeConfig,
    /// Output location, format and file naming rules.
    pub save: SaveConfig,
    /// Accepted input files.
    pub input: InputConfig,
    /// Audit log settings.
    pub log: LogConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.workers == 0 {
            return Err(ConfigError::Validation(
                "processing.workers must be at least 1".into(),
            ));
        }
        if self.resize.min == 0 || self.resize.min > self.resize.max {
            return Err(ConfigError::Validation(
                "resize.min must be at least 1 and not above resize.max".into(),
            ));
        }
        if self.save.min_name_len > self.save.max_name_len {
            return Err(ConfigError::Validation(
                "save.min_name_len must not exceed save.max_name_len".into(),
            ));
        }
        if self.save.quality == 0 || self.save.quality > 100 {
            return Err(ConfigError::Validation("save.quality must be 1-100".into()));
        }
        if output_format(&self.save.extension).is_err() {
            return Err(ConfigError::Validation(format!(
                "save.extension '{}' is not a writable image format",
                self.save.extension
            )));
        }
        if self.input.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "input.extensions must not be empty".into(),
            ));
        }
        let decodable = supported_input_extensions();
        if let Some(ext) = self
            .input
            .extensions
            .iter()
            .find(|e| !decodable.contains(&e.to_ascii_lowercase().as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "input.extensions: '{ext}' cannot be decoded (supported: {})",
                decodable.join(", ")
            )));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Number of row bands (and worker threads) per operation.
    pub workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: RowBandScheduler::DEFAULT_WORKERS,
        }
    }
}

/// Accepted range for resize target dimensions, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub min: u32,
    pub max: u32,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { min: 1, max: 3000 }
    }
}

/// Where and how edited images are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaveConfig {
    /// Output directory. A leading `~` expands to the home directory.
    pub directory: String,
    /// Output file extension; also selects the encoder.
    pub extension: String,
    /// Lossy encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Minimum file name length (after trimming), in characters.
    pub min_name_len: usize,
    /// Maximum file name length, in characters.
    pub max_name_len: usize,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: "~/Pictures".to_string(),
            extension: "jpg".to_string(),
            quality: 90,
            min_name_len: 3,
            max_name_len: 100,
        }
    }
}

impl SaveConfig {
    /// Output directory with `~` expanded.
    pub fn resolved_directory(&self) -> PathBuf {
        expand_home(&self.directory, std::env::var_os("HOME").map(PathBuf::from))
    }
}

/// Expand a leading `~` using `home`; other paths pass through unchanged.
pub fn expand_home(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

/// Which files may be opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Accepted extensions, compared case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["jpg".to_string()],
        }
    }
}

impl InputConfig {
    pub fn accepts(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(extension))
    }
}

/// Audit log settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Append-only audit log file.
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("app.txt"),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `config.toml` from `dir`, falling back to stock defaults when absent.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return resolve_config(None);
    }
    load_config_file(&path)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# rasterkit configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Worker threads per operation. The image is split into this many row bands.
# The --workers flag overrides this value.
workers = 4

# ---------------------------------------------------------------------------
# Resize
# ---------------------------------------------------------------------------
[resize]
# Accepted range for target width and height, in pixels.
min = 1
max = 3000

# ---------------------------------------------------------------------------
# Saving
# ---------------------------------------------------------------------------
[save]
# Output directory. "~" expands to your home directory.
directory = "~/Pictures"

# Output format, chosen by extension.
extension = "jpg"

# JPEG quality (1 = worst, 100 = best).
quality = 90

# Allowed file name length, in characters. Names cannot contain directories,
# and existing files are never overwritten.
min_name_len = 3
max_name_len = 100

# ---------------------------------------------------------------------------
# Input
# ---------------------------------------------------------------------------
[input]
# File extensions that may be opened (case-insensitive).
extensions = ["jpg"]

# ---------------------------------------------------------------------------
# Audit log
# ---------------------------------------------------------------------------
[log]
# Every load, operation, save and failure is appended here.
path = "app.txt"
"##
}

//! Top-level ctxscan configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CacheConfig, FilterConfig, ScanConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the scan root.
pub const PROJECT_CONFIG_FILE: &str = "ctxscan.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CTXSCAN_*`)
/// 3. Project config (`ctxscan.toml` in the scan root)
/// 4. User config (`~/.ctxscan/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CtxscanConfig {
    pub scan: ScanConfig,
    pub filter: FilterConfig,
    pub cache: CacheConfig,
}

/// Host-supplied overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_file_size: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub follow_symlinks: Option<bool>,
    pub accurate_token_count: Option<bool>,
}

impl CtxscanConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &CtxscanConfig) -> Result<(), ConfigError> {
        let positive = |field: &str, value: Option<u64>| -> Result<(), ConfigError> {
            if value == Some(0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
            Ok(())
        };

        let scan = &config.scan;
        positive("scan.max_file_size", scan.max_file_size)?;
        positive(
            "scan.directory_batch_width",
            scan.directory_batch_width.map(|v| v as u64),
        )?;
        positive("scan.file_chunk_size", scan.file_chunk_size.map(|v| v as u64))?;
        positive("scan.timeout_secs", scan.timeout_secs)?;
        positive("scan.max_depth", scan.max_depth.map(|v| v as u64))?;

        for ext in &config.filter.binary_extensions {
            if ext.contains('/') || ext.contains('\\') {
                return Err(ConfigError::InvalidValue {
                    field: "filter.binary_extensions".to_string(),
                    message: format!("'{ext}' is not a file extension"),
                });
            }
        }
        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CtxscanConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: CtxscanConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut CtxscanConfig, other: &CtxscanConfig) {
        // Scan
        let (b, o) = (&mut base.scan, &other.scan);
        if o.max_file_size.is_some() {
            b.max_file_size = o.max_file_size;
        }
        if o.directory_batch_width.is_some() {
            b.directory_batch_width = o.directory_batch_width;
        }
        if o.file_chunk_size.is_some() {
            b.file_chunk_size = o.file_chunk_size;
        }
        if o.timeout_secs.is_some() {
            b.timeout_secs = o.timeout_secs;
        }
        if o.max_depth.is_some() {
            b.max_depth = o.max_depth;
        }
        if o.follow_symlinks.is_some() {
            b.follow_symlinks = o.follow_symlinks;
        }
        if o.accurate_token_count.is_some() {
            b.accurate_token_count = o.accurate_token_count;
        }

        // Filter
        let (b, o) = (&mut base.filter, &other.filter);
        if !o.default_excludes.is_empty() {
            b.default_excludes = o.default_excludes.clone();
        }
        if !o.automatic_defaults.is_empty() {
            b.automatic_defaults = o.automatic_defaults.clone();
        }
        if !o.binary_extensions.is_empty() {
            b.binary_extensions = o.binary_extensions.clone();
        }
        if !o.ignore_file_names.is_empty() {
            b.ignore_file_names = o.ignore_file_names.clone();
        }
        if !o.collector_skip_dirs.is_empty() {
            b.collector_skip_dirs = o.collector_skip_dirs.clone();
        }

        // Cache
        let (b, o) = (&mut base.cache, &other.cache);
        if o.ignore_filter_capacity.is_some() {
            b.ignore_filter_capacity = o.ignore_filter_capacity;
        }
        if o.file_type_capacity.is_some() {
            b.file_type_capacity = o.file_type_capacity;
        }
        if o.file_metadata_max_bytes.is_some() {
            b.file_metadata_max_bytes = o.file_metadata_max_bytes;
        }
        if o.token_count_capacity.is_some() {
            b.token_count_capacity = o.token_count_capacity;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CTXSCAN_SCAN_MAX_FILE_SIZE`, `CTXSCAN_SCAN_TIMEOUT_SECS`, etc.
    fn apply_env_overrides(config: &mut CtxscanConfig) {
        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
        }

        if let Some(v) = parsed("CTXSCAN_SCAN_MAX_FILE_SIZE") {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = parsed("CTXSCAN_SCAN_TIMEOUT_SECS") {
            config.scan.timeout_secs = Some(v);
        }
        if let Some(v) = parsed("CTXSCAN_SCAN_BATCH_WIDTH") {
            config.scan.directory_batch_width = Some(v);
        }
        if let Some(v) = parsed("CTXSCAN_SCAN_CHUNK_SIZE") {
            config.scan.file_chunk_size = Some(v);
        }
        if let Some(v) = parsed("CTXSCAN_SCAN_FOLLOW_SYMLINKS") {
            config.scan.follow_symlinks = Some(v);
        }
        if let Some(v) = parsed("CTXSCAN_SCAN_ACCURATE_TOKENS") {
            config.scan.accurate_token_count = Some(v);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut CtxscanConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_file_size {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = cli.timeout_secs {
            config.scan.timeout_secs = Some(v);
        }
        if let Some(v) = cli.follow_symlinks {
            config.scan.follow_symlinks = Some(v);
        }
        if let Some(v) = cli.accurate_token_count {
            config.scan.accurate_token_count = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level config directory: `~/.ctxscan/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".ctxscan"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

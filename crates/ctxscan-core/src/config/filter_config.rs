//! Static filter tables supplied by the host.
//!
//! Empty lists fall back to the compiled tables in [`crate::constants`].

use serde::{Deserialize, Serialize};

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterConfig {
    /// Global-mode static exclude list.
    pub default_excludes: Vec<String>,
    /// Built-in patterns merged into automatic mode.
    pub automatic_defaults: Vec<String>,
    /// Extensions treated as binary, without the leading dot.
    pub binary_extensions: Vec<String>,
    /// Ignore file names read per directory in automatic mode.
    pub ignore_file_names: Vec<String>,
    /// Directory names the pattern collector never enters.
    pub collector_skip_dirs: Vec<String>,
}

fn or_default(configured: &[String], fallback: &[&str]) -> Vec<String> {
    if configured.is_empty() {
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        configured.to_vec()
    }
}

impl FilterConfig {
    pub fn effective_default_excludes(&self) -> Vec<String> {
        or_default(&self.default_excludes, constants::DEFAULT_EXCLUDE_PATTERNS)
    }

    pub fn effective_automatic_defaults(&self) -> Vec<String> {
        or_default(&self.automatic_defaults, constants::AUTOMATIC_DEFAULT_PATTERNS)
    }

    /// Lowercased, dot-stripped binary extensions.
    pub fn effective_binary_extensions(&self) -> Vec<String> {
        or_default(&self.binary_extensions, constants::BINARY_EXTENSIONS)
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }

    pub fn effective_ignore_file_names(&self) -> Vec<String> {
        or_default(&self.ignore_file_names, constants::DEFAULT_IGNORE_FILE_NAMES)
    }

    pub fn effective_collector_skip_dirs(&self) -> Vec<String> {
        or_default(&self.collector_skip_dirs, constants::COLLECTOR_SKIP_DIRS)
    }
}

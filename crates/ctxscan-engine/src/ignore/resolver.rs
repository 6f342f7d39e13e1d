//! Ignore-rule resolution with a composite-key cache.
//!
//! Two mutually exclusive policies:
//! - **global**: the static exclude list plus caller patterns. No directory
//!   traversal.
//! - **automatic**: built-in defaults plus every ignore file found under the
//!   root, each pattern scoped to the directory it came from. Caller
//!   patterns are not applied.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ctxscan_core::config::CtxscanConfig;
use ctxscan_core::errors::IgnoreError;
use ctxscan_core::types::ScanMode;
use serde::{Deserialize, Serialize};

use super::collector::{parse_patterns, GitignorePatternCollector, GitignorePatternMap};
use super::filter::IgnoreFilter;
use super::key::IgnoreCacheKey;
use crate::cache::ClearableCache;
use crate::path::PathNormalizer;

/// Where the patterns of a resolved filter came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternProvenance {
    Global {
        global: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Automatic {
        per_directory: GitignorePatternMap,
        defaults: Vec<String>,
    },
}

/// An immutable cache entry: the compiled filter and its provenance.
#[derive(Debug)]
pub struct ResolvedIgnore {
    pub key: IgnoreCacheKey,
    pub filter: IgnoreFilter,
    pub provenance: PatternProvenance,
}

/// Cache counters, for inspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Directories visited by the pattern collector.
    pub collector_dirs_read: usize,
}

pub struct IgnoreRuleResolver {
    cache: ClearableCache<IgnoreCacheKey, Arc<ResolvedIgnore>>,
    collector: GitignorePatternCollector,
    normalizer: PathNormalizer,
    default_excludes: Vec<String>,
    automatic_defaults: Vec<String>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl IgnoreRuleResolver {
    pub fn new(config: &CtxscanConfig, normalizer: PathNormalizer) -> Self {
        Self {
            cache: ClearableCache::new(config.cache.effective_ignore_filter_capacity()),
            collector: GitignorePatternCollector::from_config(config, normalizer),
            normalizer,
            default_excludes: config.filter.effective_default_excludes(),
            automatic_defaults: config.filter.effective_automatic_defaults(),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Resolve the filter for `(root, mode, custom_patterns)`.
    ///
    /// Repeated calls with the same inputs return the same `Arc` without
    /// touching the filesystem until the cache is cleared.
    pub fn resolve(
        &self,
        root: &Path,
        mode: ScanMode,
        custom_patterns: &[String],
    ) -> Result<Arc<ResolvedIgnore>, IgnoreError> {
        let key = IgnoreCacheKey::new(&self.normalizer, root, mode, custom_patterns);
        if let Some(hit) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(root = key.root(), %mode, "ignore filter cache hit");
            return Ok(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let resolved = match mode {
            ScanMode::Global => self.build_global(root, key, custom_patterns)?,
            ScanMode::Automatic => self.build_automatic(root, key)?,
        };
        let resolved = Arc::new(resolved);
        self.cache.insert(resolved.key.clone(), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn build_global(
        &self,
        root: &Path,
        key: IgnoreCacheKey,
        custom_patterns: &[String],
    ) -> Result<ResolvedIgnore, IgnoreError> {
        let mut global = normalize_patterns(&self.default_excludes, self.normalizer.is_windows());
        for pattern in normalize_patterns(custom_patterns, self.normalizer.is_windows()) {
            if !global.contains(&pattern) {
                global.push(pattern);
            }
        }
        let filter = IgnoreFilter::build(
            root,
            global.iter().map(String::as_str),
            self.normalizer.is_case_insensitive(),
        )?;
        tracing::info!(root = key.root(), patterns = global.len(), "resolved global ignore filter");
        Ok(ResolvedIgnore {
            key,
            filter,
            provenance: PatternProvenance::Global { global },
        })
    }

    fn build_automatic(&self, root: &Path, key: IgnoreCacheKey) -> Result<ResolvedIgnore, IgnoreError> {
        match std::fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(IgnoreError::RootUnreadable {
                    path: key.root().to_string(),
                    message: "not a directory".to_string(),
                })
            }
            Err(e) => {
                return Err(IgnoreError::RootUnreadable {
                    path: key.root().to_string(),
                    message: e.to_string(),
                })
            }
        }

        let defaults = normalize_patterns(&self.automatic_defaults, self.normalizer.is_windows());
        let per_directory = self.collector.collect(root, root);

        let mut compiled = defaults.clone();
        // Root patterns first, then subdirectories in path order.
        if let Some(root_patterns) = per_directory.get(".") {
            compiled.extend(root_patterns.iter().cloned());
        }
        for (rel_dir, patterns) in per_directory.iter().filter(|(dir, _)| dir.as_str() != ".") {
            compiled.extend(patterns.iter().map(|p| scope_pattern(rel_dir, p)));
        }

        let filter = IgnoreFilter::build(
            root,
            compiled.iter().map(String::as_str),
            self.normalizer.is_case_insensitive(),
        )?;
        tracing::info!(
            root = key.root(),
            ignore_files = per_directory.len(),
            patterns = compiled.len(),
            "resolved automatic ignore filter"
        );
        Ok(ResolvedIgnore {
            key,
            filter,
            provenance: PatternProvenance::Automatic {
                per_directory,
                defaults,
            },
        })
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            cache_hits: self.hits.load(Ordering::Relaxed),
            cache_misses: self.misses.load(Ordering::Relaxed),
            collector_dirs_read: self.collector.dirs_read(),
        }
    }

    pub fn normalizer(&self) -> &PathNormalizer {
        &self.normalizer
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Scope a pattern from `rel_dir`'s ignore file to the scan root.
///
/// Root-anchored (`/x`) and globstar (`**`) patterns are kept as written.
/// Negations keep their `!` in front of the scoped body; nested negation
/// precedence beyond that is best-effort.
pub fn scope_pattern(rel_dir: &str, pattern: &str) -> String {
    if rel_dir.is_empty() || rel_dir == "." {
        return pattern.to_string();
    }
    let (negated, body) = match pattern.strip_prefix('!') {
        Some(body) => (true, body),
        None => (false, pattern),
    };
    if body.starts_with('/') || body.contains("**") {
        return pattern.to_string();
    }
    let scoped = format!("{}/{}", rel_dir.trim_end_matches('/'), body);
    if negated {
        format!("!{scoped}")
    } else {
        scoped
    }
}

/// Trim and drop blanks and comments. Under Windows path rules `\` in a
/// pattern is a separator.
fn normalize_patterns(patterns: &[String], windows: bool) -> Vec<String> {
    parse_patterns(&patterns.join("\n"))
        .into_iter()
        .map(|p| if windows { p.replace('\\', "/") } else { p })
        .collect()
}

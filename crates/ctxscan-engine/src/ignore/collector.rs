//! Per-directory ignore-file discovery.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use ctxscan_core::config::CtxscanConfig;
use ctxscan_core::types::collections::FxHashSet;

use crate::path::{PathNormalizer, RelativePath};

/// Root-relative directory path (`"."` for the root) to the pattern lines
/// found in that directory's ignore files, in file order.
pub type GitignorePatternMap = BTreeMap<String, Vec<String>>;

/// Walks downward from a start directory collecting raw ignore patterns.
///
/// Performs no filtering of its own: every directory except the always-skipped
/// names is visited, whether or not a collected pattern would exclude it.
pub struct GitignorePatternCollector {
    ignore_file_names: Vec<String>,
    skip_dirs: FxHashSet<String>,
    max_depth: usize,
    normalizer: PathNormalizer,
    dirs_read: AtomicUsize,
}

impl GitignorePatternCollector {
    pub fn new(
        ignore_file_names: Vec<String>,
        skip_dirs: impl IntoIterator<Item = String>,
        max_depth: usize,
        normalizer: PathNormalizer,
    ) -> Self {
        Self {
            ignore_file_names,
            skip_dirs: skip_dirs.into_iter().collect(),
            max_depth,
            normalizer,
            dirs_read: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &CtxscanConfig, normalizer: PathNormalizer) -> Self {
        Self::new(
            config.filter.effective_ignore_file_names(),
            config.filter.effective_collector_skip_dirs(),
            config.scan.effective_max_depth(),
            normalizer,
        )
    }

    /// Total directories visited by this collector since construction.
    pub fn dirs_read(&self) -> usize {
        self.dirs_read.load(Ordering::Relaxed)
    }

    /// Collect patterns from `start_dir` and every non-skipped descendant.
    ///
    /// Keys are relative to `root_dir`. Unreadable directories are logged and
    /// treated as empty. Symlinked directories are not entered.
    pub fn collect(&self, start_dir: &Path, root_dir: &Path) -> GitignorePatternMap {
        let mut patterns = GitignorePatternMap::new();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut stack: Vec<(PathBuf, usize)> = vec![(start_dir.to_path_buf(), 0)];

        while let Some((dir, depth)) = stack.pop() {
            if !visited.insert(self.normalizer.normalize(&dir)) {
                continue;
            }
            self.dirs_read.fetch_add(1, Ordering::Relaxed);

            let lines = self.read_ignore_files(&dir);
            if !lines.is_empty() {
                match self.normalizer.relative_to(root_dir, &dir) {
                    RelativePath::Root => {
                        patterns.insert(".".to_string(), lines);
                    }
                    RelativePath::Inside(rel) => {
                        patterns.insert(rel.into_string(), lines);
                    }
                    RelativePath::Outside | RelativePath::OtherVolume => {
                        tracing::warn!(dir = %dir.display(), "ignore file outside scan root, skipped");
                    }
                }
            }

            if depth >= self.max_depth {
                tracing::debug!(dir = %dir.display(), depth, "collector depth cap reached");
                continue;
            }

            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "cannot list directory, skipping");
                    continue;
                }
            };
            for entry in entries.flatten() {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    continue;
                }
                let name = entry.file_name();
                if self.skip_dirs.contains(name.to_string_lossy().as_ref()) {
                    continue;
                }
                stack.push((entry.path(), depth + 1));
            }
        }

        patterns
    }

    fn read_ignore_files(&self, dir: &Path) -> Vec<String> {
        let mut lines = Vec::new();
        for name in &self.ignore_file_names {
            let path = dir.join(name);
            match fs::read_to_string(&path) {
                Ok(content) => lines.extend(parse_patterns(&content)),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "cannot read ignore file");
                }
            }
        }
        lines
    }
}

/// Split ignore-file content into pattern lines, dropping blanks and comments.
pub fn parse_patterns(content: &str) -> Vec<String> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_blanks_and_comments() {
        let content = "\u{feff}# build output\nbuild/\n\n   \n  *.log  \n#another\n!keep.log\r\n";
        assert_eq!(parse_patterns(content), vec!["build/", "*.log", "!keep.log"]);
    }

    #[test]
    fn parse_of_comment_only_file_is_empty() {
        assert!(parse_patterns("# nothing\n\n").is_empty());
    }
}

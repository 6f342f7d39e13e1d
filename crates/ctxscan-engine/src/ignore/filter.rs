//! Compiled ignore matcher over root-relative paths.

use std::path::Path;

use ctxscan_core::errors::IgnoreError;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::path::RelPath;

/// Answers "is this relative path excluded?".
///
/// Queries take a [`RelPath`], so an absolute or root-escaping path can never
/// reach the underlying matcher.
#[derive(Debug)]
pub struct IgnoreFilter {
    matcher: Gitignore,
    rejected: Vec<String>,
}

impl IgnoreFilter {
    /// Compile `patterns` in order; later patterns take precedence.
    ///
    /// A pattern the matcher cannot parse is logged and dropped rather than
    /// failing the whole filter.
    pub fn build<'a>(
        root: &Path,
        patterns: impl IntoIterator<Item = &'a str>,
        case_insensitive: bool,
    ) -> Result<Self, IgnoreError> {
        let mut builder = GitignoreBuilder::new(root);
        builder
            .case_insensitive(case_insensitive)
            .map_err(|e| IgnoreError::Build {
                message: e.to_string(),
            })?;
        let mut rejected = Vec::new();
        for pattern in patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                let err = IgnoreError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                };
                tracing::warn!(error = %err, "dropping ignore pattern");
                rejected.push(pattern.to_string());
            }
        }
        let matcher = builder.build().map_err(|e| IgnoreError::Build {
            message: e.to_string(),
        })?;
        Ok(Self { matcher, rejected })
    }

    /// Whether `path` or any of its parent directories is excluded.
    pub fn is_ignored(&self, path: &RelPath, is_dir: bool) -> bool {
        self.matcher
            .matched_path_or_any_parents(path.as_path(), is_dir)
            .is_ignore()
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.matcher.num_ignores() as usize + self.matcher.num_whitelists() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Patterns dropped as invalid during the build.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
}

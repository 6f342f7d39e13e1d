//! Ignore-rule resolution errors.

use super::error_code::{self, CtxscanErrorCode};

/// Errors raised while building an ignore filter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IgnoreError {
    #[error("Invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to build ignore filter: {message}")]
    Build { message: String },

    #[error("Cannot resolve ignore rules for {path}: {message}")]
    RootUnreadable { path: String, message: String },
}

impl CtxscanErrorCode for IgnoreError {
    fn error_code(&self) -> &'static str {
        error_code::IGNORE_ERROR
    }
}

//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, CtxscanErrorCode};
use super::IgnoreError;

/// Errors that end a scan without a `complete` status.
///
/// Per-file and per-subdirectory failures never appear here; they are
/// recorded on the affected `FileRecord` or logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Cannot read scan root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scan root is not a directory: {path}")]
    RootNotDirectory { path: PathBuf },

    #[error("A scan is already in progress")]
    Busy,

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Scan timed out after {secs}s")]
    TimedOut { secs: u64 },

    #[error("Failed to resolve ignore rules: {0}")]
    Ignore(#[from] IgnoreError),
}

impl CtxscanErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Busy => error_code::SCAN_BUSY,
            Self::Cancelled => error_code::CANCELLED,
            Self::TimedOut { .. } => error_code::TIMED_OUT,
            Self::Ignore(e) => e.error_code(),
            _ => error_code::SCAN_ERROR,
        }
    }
}

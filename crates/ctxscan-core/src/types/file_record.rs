//! FileRecord: the per-file result unit returned by a scan.

use serde::{Deserialize, Serialize};

/// Why a file's content was not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Larger than the configured maximum; content never read.
    TooLarge,
    PermissionDenied,
    /// Vanished between listing and reading.
    NotFound,
    ReadFailed,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::TooLarge => "too_large",
            SkipReason::PermissionDenied => "permission_denied",
            SkipReason::NotFound => "not_found",
            SkipReason::ReadFailed => "read_failed",
        }
    }

    /// Map an I/O error from a content read to a reason code.
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => SkipReason::PermissionDenied,
            std::io::ErrorKind::NotFound => SkipReason::NotFound,
            _ => SkipReason::ReadFailed,
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file discovered by a scan.
///
/// Invariants, upheld by the constructors:
/// - `is_skipped` implies `content` is `None` and `token_count == 0`.
/// - `is_binary` implies `content` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub name: String,
    /// Absolute, normalized path.
    pub path: String,
    /// Path relative to the scan root, `/`-separated.
    pub relative_path: String,
    pub size: u64,
    pub is_binary: bool,
    pub is_skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
    pub token_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileRecord {
    /// A readable text file with its content loaded.
    pub fn text(
        name: String,
        path: String,
        relative_path: String,
        size: u64,
        content: String,
        token_count: usize,
    ) -> Self {
        Self {
            name,
            path,
            relative_path,
            size,
            is_binary: false,
            is_skipped: false,
            skip_reason: None,
            token_count,
            content: Some(content),
        }
    }

    /// A binary file: listed with its size, content never loaded.
    pub fn binary(name: String, path: String, relative_path: String, size: u64) -> Self {
        Self {
            name,
            path,
            relative_path,
            size,
            is_binary: true,
            is_skipped: false,
            skip_reason: None,
            token_count: 0,
            content: None,
        }
    }

    /// A file whose content could not or should not be loaded.
    pub fn skipped(
        name: String,
        path: String,
        relative_path: String,
        size: u64,
        is_binary: bool,
        reason: SkipReason,
    ) -> Self {
        Self {
            name,
            path,
            relative_path,
            size,
            is_binary,
            is_skipped: true,
            skip_reason: Some(reason),
            token_count: 0,
            content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_record_has_no_content_or_tokens() {
        let r = FileRecord::skipped(
            "big.txt".into(),
            "/p/big.txt".into(),
            "big.txt".into(),
            6_291_456,
            false,
            SkipReason::TooLarge,
        );
        assert!(r.is_skipped);
        assert!(r.content.is_none());
        assert_eq!(r.token_count, 0);
        assert_eq!(r.skip_reason, Some(SkipReason::TooLarge));
    }

    #[test]
    fn binary_record_has_no_content() {
        let r = FileRecord::binary("a.png".into(), "/p/a.png".into(), "a.png".into(), 2048);
        assert!(r.is_binary);
        assert!(!r.is_skipped);
        assert!(r.content.is_none());
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_content() {
        let r = FileRecord::binary("a.png".into(), "/p/a.png".into(), "a.png".into(), 2048);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["relativePath"], "a.png");
        assert_eq!(json["isBinary"], true);
        assert!(json.get("content").is_none());
        assert!(json.get("skipReason").is_none());
    }

    #[test]
    fn io_errors_map_to_reason_codes() {
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        let other = std::io::Error::other("boom");
        assert_eq!(SkipReason::from_io(&denied), SkipReason::PermissionDenied);
        assert_eq!(SkipReason::from_io(&missing), SkipReason::NotFound);
        assert_eq!(SkipReason::from_io(&other), SkipReason::ReadFailed);
    }
}

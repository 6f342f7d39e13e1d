//! Scan-level types: mode, statistics, and the host status stream.

use serde::{Deserialize, Serialize};

use super::file_record::FileRecord;

/// Ignore policy for a scan. The two modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Per-directory ignore files discovered under the root, plus built-in defaults.
    Automatic,
    /// Static exclude list plus caller-supplied patterns; no pattern discovery.
    Global,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Automatic => "automatic",
            ScanMode::Global => "global",
        }
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "automatic" => Ok(ScanMode::Automatic),
            "global" => Ok(ScanMode::Global),
            other => Err(format!("unknown scan mode '{other}'")),
        }
    }
}

/// Aggregate statistics for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub directories_processed: usize,
    pub files_processed: usize,
    pub files_skipped_ignored: usize,
    pub dirs_skipped_ignored: usize,
    pub files_skipped_large: usize,
    pub files_skipped_unreadable: usize,
    pub entries_skipped_invalid: usize,
    pub binary_files: usize,
    pub total_size_bytes: u64,
    pub metadata_cache_hits: usize,
    /// `stat` calls issued for directory entries.
    pub metadata_reads: usize,
    /// Content reads issued for text files.
    pub content_reads: usize,
    pub duration_ms: u64,
}

/// Status stream emitted to the host during a scan.
///
/// Zero or more `Processing` values are followed by exactly one terminal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ScanStatus {
    #[serde(rename_all = "camelCase")]
    Processing {
        directories_processed: usize,
        files_processed: usize,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        file_records: Vec<FileRecord>,
        stats: ScanStats,
    },
    Cancelled,
    TimedOut,
    Error {
        message: String,
    },
    Busy,
}

impl ScanStatus {
    /// Whether this value ends the stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScanStatus::Processing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Automatic".parse::<ScanMode>(), Ok(ScanMode::Automatic));
        assert_eq!(" global ".parse::<ScanMode>(), Ok(ScanMode::Global));
        assert!("gitignore".parse::<ScanMode>().is_err());
    }

    #[test]
    fn status_serializes_with_status_tag() {
        let progress = ScanStatus::Processing {
            directories_processed: 3,
            files_processed: 40,
        };
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["status"], "processing");
        assert_eq!(json["directoriesProcessed"], 3);
        assert_eq!(json["filesProcessed"], 40);

        let timed_out = serde_json::to_value(&ScanStatus::TimedOut).unwrap();
        assert_eq!(timed_out["status"], "timedOut");

        let err = serde_json::to_value(&ScanStatus::Error {
            message: "boom".into(),
        })
        .unwrap();
        assert_eq!(err["status"], "error");
        assert_eq!(err["message"], "boom");
    }

    #[test]
    fn only_processing_is_non_terminal() {
        assert!(!ScanStatus::Processing {
            directories_processed: 0,
            files_processed: 0
        }
        .is_terminal());
        assert!(ScanStatus::Busy.is_terminal());
        assert!(ScanStatus::Cancelled.is_terminal());
    }
}

//! Event payload types for the scan lifecycle.

use crate::types::{FileRecord, ScanMode, ScanStats};

/// Payload for `on_scan_started`.
#[derive(Debug, Clone)]
pub struct ScanStartedEvent {
    pub root: String,
    pub mode: ScanMode,
}

/// Payload for `on_scan_progress`. Counts are cumulative and never decrease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanProgressEvent {
    pub directories_processed: usize,
    pub files_processed: usize,
}

/// Payload for `on_scan_complete`.
#[derive(Debug, Clone)]
pub struct ScanCompleteEvent {
    pub file_records: Vec<FileRecord>,
    pub stats: ScanStats,
}

/// Payload for `on_scan_cancelled`.
#[derive(Debug, Clone)]
pub struct ScanCancelledEvent {
    pub files_processed: usize,
}

/// Payload for `on_scan_timed_out`.
#[derive(Debug, Clone)]
pub struct ScanTimedOutEvent {
    pub files_processed: usize,
    pub timeout_secs: u64,
}

/// Payload for `on_scan_error`.
#[derive(Debug, Clone)]
pub struct ScanErrorEvent {
    pub message: String,
}

/// Payload for `on_scan_busy`.
#[derive(Debug, Clone)]
pub struct ScanBusyEvent {
    pub requested_root: String,
}

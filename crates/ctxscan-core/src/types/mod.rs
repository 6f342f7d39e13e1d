//! Shared data types.

pub mod collections;
pub mod file_record;
pub mod scan;

pub use file_record::{FileRecord, SkipReason};
pub use scan::{ScanMode, ScanStats, ScanStatus};

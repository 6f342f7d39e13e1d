//! Scanner subsystem: session lifecycle, progress, the file-metadata cache,
//! and the bounded-concurrency walker.

pub mod metadata;
pub mod progress;
pub mod session;
pub mod walker;

pub use metadata::FileMetadataCache;
pub use progress::ProgressTracker;
pub use session::{ScanSession, ScanState};
pub use walker::{DirectoryScanner, WalkOptions, WalkOutcome};

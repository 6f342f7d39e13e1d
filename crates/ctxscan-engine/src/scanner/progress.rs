//! Cumulative progress counters.

use std::sync::{Mutex, PoisonError};

use ctxscan_core::events::types::ScanProgressEvent;
use ctxscan_core::events::ScanEventHandler;

/// Directory and file counts for one session.
///
/// Increments and the resulting event happen under one lock, so handlers
/// observe counts that never decrease even when chunks finish on different
/// worker threads.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    counts: Mutex<ScanProgressEvent>,
}

impl ProgressTracker {
    pub fn directory_done(&self, events: &dyn ScanEventHandler) {
        self.bump(1, 0, events);
    }

    pub fn files_done(&self, files: usize, events: &dyn ScanEventHandler) {
        self.bump(0, files, events);
    }

    pub fn snapshot(&self) -> ScanProgressEvent {
        *self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self, directories: usize, files: usize, events: &dyn ScanEventHandler) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts.directories_processed += directories;
        counts.files_processed += files;
        events.on_scan_progress(&counts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ScanProgressEvent>>);

    impl ScanEventHandler for Recorder {
        fn on_scan_progress(&self, event: &ScanProgressEvent) {
            self.0.lock().unwrap().push(*event);
        }
    }

    #[test]
    fn counts_accumulate_and_are_reported() {
        let tracker = ProgressTracker::default();
        let recorder = Recorder::default();
        tracker.directory_done(&recorder);
        tracker.files_done(20, &recorder);
        tracker.files_done(3, &recorder);

        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2].directories_processed, 1);
        assert_eq!(seen[2].files_processed, 23);
        assert_eq!(tracker.snapshot(), seen[2]);
    }
}

//! ScanEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Receives scan lifecycle events.
///
/// Handlers only override the events they care about. Exactly one of the
/// terminal callbacks (`complete`, `cancelled`, `timed_out`, `error`, `busy`)
/// fires per scan request. `Send + Sync` because progress is reported from
/// worker threads.
pub trait ScanEventHandler: Send + Sync {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {}
    fn on_scan_progress(&self, _event: &ScanProgressEvent) {}

    // ---- Terminal ----
    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {}
    fn on_scan_cancelled(&self, _event: &ScanCancelledEvent) {}
    fn on_scan_timed_out(&self, _event: &ScanTimedOutEvent) {}
    fn on_scan_error(&self, _event: &ScanErrorEvent) {}
    fn on_scan_busy(&self, _event: &ScanBusyEvent) {}
}

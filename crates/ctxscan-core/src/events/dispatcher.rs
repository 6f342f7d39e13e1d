//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::ScanEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// With no handlers registered, emitting is an empty loop.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ScanEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ScanEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Handlers that panic are caught and do not prevent subsequent handlers
    /// from receiving the event.
    fn emit<F: Fn(&dyn ScanEventHandler)>(&self, event_name: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!(event = event_name, "scan event handler panicked");
            }
        }
    }

    pub fn emit_scan_started(&self, event: &ScanStartedEvent) {
        self.emit("scan_started", |h| h.on_scan_started(event));
    }

    pub fn emit_scan_progress(&self, event: &ScanProgressEvent) {
        self.emit("scan_progress", |h| h.on_scan_progress(event));
    }

    pub fn emit_scan_complete(&self, event: &ScanCompleteEvent) {
        self.emit("scan_complete", |h| h.on_scan_complete(event));
    }

    pub fn emit_scan_cancelled(&self, event: &ScanCancelledEvent) {
        self.emit("scan_cancelled", |h| h.on_scan_cancelled(event));
    }

    pub fn emit_scan_timed_out(&self, event: &ScanTimedOutEvent) {
        self.emit("scan_timed_out", |h| h.on_scan_timed_out(event));
    }

    pub fn emit_scan_error(&self, event: &ScanErrorEvent) {
        self.emit("scan_error", |h| h.on_scan_error(event));
    }

    pub fn emit_scan_busy(&self, event: &ScanBusyEvent) {
        self.emit("scan_busy", |h| h.on_scan_busy(event));
    }
}

impl ScanEventHandler for EventDispatcher {
    fn on_scan_started(&self, event: &ScanStartedEvent) {
        self.emit_scan_started(event);
    }
    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        self.emit_scan_progress(event);
    }
    fn on_scan_complete(&self, event: &ScanCompleteEvent) {
        self.emit_scan_complete(event);
    }
    fn on_scan_cancelled(&self, event: &ScanCancelledEvent) {
        self.emit_scan_cancelled(event);
    }
    fn on_scan_timed_out(&self, event: &ScanTimedOutEvent) {
        self.emit_scan_timed_out(event);
    }
    fn on_scan_error(&self, event: &ScanErrorEvent) {
        self.emit_scan_error(event);
    }
    fn on_scan_busy(&self, event: &ScanBusyEvent) {
        self.emit_scan_busy(event);
    }
}

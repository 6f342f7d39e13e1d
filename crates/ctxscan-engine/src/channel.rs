//! Status stream over a channel.

use crossbeam_channel::{Receiver, Sender};

use ctxscan_core::events::types::*;
use ctxscan_core::events::ScanEventHandler;
use ctxscan_core::types::ScanStatus;

/// Forwards scan events to a host as [`ScanStatus`] values.
///
/// The receiver yields zero or more `Processing` values followed by exactly
/// one terminal value, then disconnects once the scan thread drops its
/// sender.
#[derive(Debug, Clone)]
pub struct ChannelEventHandler {
    tx: Sender<ScanStatus>,
}

impl ChannelEventHandler {
    pub fn new(tx: Sender<ScanStatus>) -> Self {
        Self { tx }
    }

    pub fn unbounded() -> (Self, Receiver<ScanStatus>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }

    fn send(&self, status: ScanStatus) {
        if self.tx.send(status).is_err() {
            tracing::debug!("status receiver dropped");
        }
    }
}

impl ScanEventHandler for ChannelEventHandler {
    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        self.send(ScanStatus::Processing {
            directories_processed: event.directories_processed,
            files_processed: event.files_processed,
        });
    }

    fn on_scan_complete(&self, event: &ScanCompleteEvent) {
        self.send(ScanStatus::Complete {
            file_records: event.file_records.clone(),
            stats: event.stats.clone(),
        });
    }

    fn on_scan_cancelled(&self, _event: &ScanCancelledEvent) {
        self.send(ScanStatus::Cancelled);
    }

    fn on_scan_timed_out(&self, _event: &ScanTimedOutEvent) {
        self.send(ScanStatus::TimedOut);
    }

    fn on_scan_error(&self, event: &ScanErrorEvent) {
        self.send(ScanStatus::Error {
            message: event.message.clone(),
        });
    }

    fn on_scan_busy(&self, _event: &ScanBusyEvent) {
        self.send(ScanStatus::Busy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_become_statuses() {
        let (handler, rx) = ChannelEventHandler::unbounded();
        handler.on_scan_progress(&ScanProgressEvent {
            directories_processed: 1,
            files_processed: 2,
        });
        handler.on_scan_error(&ScanErrorEvent {
            message: "root unreadable".into(),
        });
        drop(handler);

        let statuses: Vec<ScanStatus> = rx.iter().collect();
        assert_eq!(
            statuses,
            vec![
                ScanStatus::Processing {
                    directories_processed: 1,
                    files_processed: 2
                },
                ScanStatus::Error {
                    message: "root unreadable".into()
                },
            ]
        );
    }

    #[test]
    fn send_after_receiver_drop_is_silent() {
        let (handler, rx) = ChannelEventHandler::unbounded();
        drop(rx);
        handler.on_scan_busy(&ScanBusyEvent {
            requested_root: "/p".into(),
        });
    }
}

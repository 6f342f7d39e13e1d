//! Tests for the event dispatcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ctxscan_core::events::types::*;
use ctxscan_core::events::{EventDispatcher, ScanEventHandler};
use ctxscan_core::types::ScanStats;

#[derive(Default)]
struct Recorder {
    progress: Mutex<Vec<ScanProgressEvent>>,
    completes: AtomicUsize,
}

impl ScanEventHandler for Recorder {
    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        self.progress.lock().unwrap().push(*event);
    }
    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {
        self.completes.fetch_add(1, Ordering::SeqCst);
    }
}

struct Panicker;

impl ScanEventHandler for Panicker {
    fn on_scan_progress(&self, _event: &ScanProgressEvent) {
        panic!("handler failure");
    }
}

#[test]
fn empty_dispatcher_is_a_no_op() {
    let dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.handler_count(), 0);
    dispatcher.emit_scan_busy(&ScanBusyEvent {
        requested_root: "/x".into(),
    });
}

#[test]
fn events_reach_every_handler() {
    let a = Arc::new(Recorder::default());
    let b = Arc::new(Recorder::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(a.clone());
    dispatcher.register(b.clone());

    dispatcher.emit_scan_progress(&ScanProgressEvent {
        directories_processed: 1,
        files_processed: 20,
    });
    dispatcher.emit_scan_complete(&ScanCompleteEvent {
        file_records: vec![],
        stats: ScanStats::default(),
    });

    for r in [&a, &b] {
        assert_eq!(r.progress.lock().unwrap().len(), 1);
        assert_eq!(r.completes.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn panicking_handler_does_not_block_later_handlers() {
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(Panicker));
    dispatcher.register(recorder.clone());

    dispatcher.emit_scan_progress(&ScanProgressEvent {
        directories_processed: 2,
        files_processed: 3,
    });

    assert_eq!(recorder.progress.lock().unwrap().len(), 1);
}

#[test]
fn dispatcher_is_itself_a_handler() {
    let recorder = Arc::new(Recorder::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(recorder.clone());

    let as_handler: &dyn ScanEventHandler = &dispatcher;
    as_handler.on_scan_progress(&ScanProgressEvent {
        directories_processed: 0,
        files_processed: 0,
    });
    assert_eq!(recorder.progress.lock().unwrap().len(), 1);
}

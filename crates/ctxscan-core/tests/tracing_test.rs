//! Tests for tracing initialization.

use std::sync::Mutex;

use ctxscan_core::tracing::init_tracing;

static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn init_tracing_accepts_module_filters() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CTXSCAN_LOG", "ctxscan_engine::scanner=debug,ctxscan_engine::ignore=warn");
    init_tracing();
    std::env::remove_var("CTXSCAN_LOG");
}

#[test]
fn init_tracing_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn invalid_filter_falls_back_to_default() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CTXSCAN_LOG", "[[not a filter");
    init_tracing();
    std::env::remove_var("CTXSCAN_LOG");
}

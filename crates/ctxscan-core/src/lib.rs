//! # ctxscan-core
//!
//! Core types, traits, errors, config, events, tracing, and constants shared
//! by the ctxscan engine and its hosts.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

pub use errors::{ConfigError, IgnoreError, ScanError};
pub use types::{FileRecord, ScanMode, ScanStats, ScanStatus, SkipReason};

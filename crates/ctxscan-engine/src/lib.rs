//! # ctxscan-engine
//!
//! Ignore-rule resolution and bounded-concurrency directory scanning.
//!
//! Two ignore policies are available per scan: `automatic` (per-directory
//! `.gitignore` files plus built-in defaults) and `global` (a static exclude
//! list plus caller patterns). [`ScanEngine`] ties path normalization, file
//! classification, filter resolution and the walker together behind the
//! four host operations: start, cancel, clear caches and pattern
//! introspection.

pub mod cache;
pub mod channel;
pub mod classify;
pub mod engine;
pub mod ignore;
pub mod path;
pub mod scanner;

pub use channel::ChannelEventHandler;
pub use engine::{ScanEngine, ScanReport};
pub use ignore::{IgnoreRuleResolver, PatternProvenance};
pub use path::{PathNormalizer, RelPath, RelativePath};
pub use scanner::ScanState;

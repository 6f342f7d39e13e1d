//! Configuration system for ctxscan.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod cache_config;
pub mod ctxscan_config;
pub mod filter_config;
pub mod scan_config;

pub use cache_config::CacheConfig;
pub use ctxscan_config::{CliOverrides, CtxscanConfig};
pub use filter_config::FilterConfig;
pub use scan_config::ScanConfig;

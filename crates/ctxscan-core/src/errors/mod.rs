//! Error handling for ctxscan.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod ignore_error;
pub mod scan_error;

pub use config_error::ConfigError;
pub use error_code::CtxscanErrorCode;
pub use ignore_error::IgnoreError;
pub use scan_error::ScanError;

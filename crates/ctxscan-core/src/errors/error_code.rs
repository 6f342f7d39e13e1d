//! CtxscanErrorCode trait for host-boundary conversion.

/// Structured error code attached to every ctxscan error enum.
pub trait CtxscanErrorCode {
    /// Returns the host error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted host string: `[ERROR_CODE] message`.
    fn host_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const SCAN_BUSY: &str = "SCAN_BUSY";
pub const CANCELLED: &str = "CANCELLED";
pub const TIMED_OUT: &str = "TIMED_OUT";
pub const IGNORE_ERROR: &str = "IGNORE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";

//! Central error types for the NeuroScreenCaster core.
//!
//! The core distinguishes a small set of failure kinds so callers (CLI, UI
//! shell) can react without string matching. All errors implement
//! `Serialize` so they can cross an IPC boundary as plain messages.

use serde::Serialize;
use thiserror::Error;

/// Main error type for core operations.
#[derive(Error, Debug)]
pub enum NscError {
    /// Schema version field missing or unexpected. Loads fail whole; the
    /// core never partially imports a document.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A documented invariant does not hold (non-monotonic timestamps,
    /// out-of-range rectangles, overlapping segments).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Event stream is empty or carries no usable coordinates. The engine
    /// still runs and emits zero auto segments; callers surface a warning.
    #[error("Capture shortfall: {0}")]
    CaptureShortfall(String),

    /// A required external resource is missing (video file, encoder).
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Frame encoder reported a terminal failure.
    #[error("Encoder error: {0}")]
    EncoderError(String),

    /// Export/render pipeline error outside the encoder itself.
    #[error("Export error: {0}")]
    ExportError(String),

    /// Cooperative cancellation. Terminal, reported distinctly from
    /// failures in export status.
    #[error("Cancelled")]
    Cancelled,

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Filesystem operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Serialize as the error message string for IPC compatibility.
impl Serialize for NscError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<String> for NscError {
    fn from(msg: String) -> Self {
        NscError::Other(msg)
    }
}

impl From<&str> for NscError {
    fn from(msg: &str) -> Self {
        NscError::Other(msg.to_string())
    }
}

impl NscError {
    /// True for the cooperative-cancel terminal state, which export status
    /// reports separately from real failures.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NscError::Cancelled)
    }
}

/// Extension trait for adding context to Results.
///
/// Allows chaining context information onto errors for better diagnostics
/// without pulling in a catch-all error crate.
pub trait ResultExt<T> {
    /// Add context to an error, converting it to `NscError::Other`.
    fn context(self, msg: &str) -> NscResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> NscResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> NscResult<T> {
        self.map_err(|e| NscError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> NscResult<T> {
        self.map_err(|e| NscError::Other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to `NscError::Other` with the given message.
    fn context(self, msg: &str) -> NscResult<T>;

    /// Convert None to `NscError::Other` with a lazily evaluated message.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> NscResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> NscResult<T> {
        self.ok_or_else(|| NscError::Other(msg.to_string()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> NscResult<T> {
        self.ok_or_else(|| NscError::Other(f()))
    }
}

/// Type alias for Results using NscError.
pub type NscResult<T> = Result<T, NscError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NscError::SchemaMismatch("expected version 1, got 7".to_string());
        assert_eq!(err.to_string(), "Schema mismatch: expected version 1, got 7");
    }

    #[test]
    fn test_error_serialization() {
        let err = NscError::ResourceUnavailable("raw.mp4 not found".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("raw.mp4 not found"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NscError = io_err.into();
        assert!(matches!(err, NscError::IoError(_)));
    }

    #[test]
    fn test_cancelled_is_not_a_failure_kind() {
        assert!(NscError::Cancelled.is_cancelled());
        assert!(!NscError::ExportError("boom".to_string()).is_cancelled());
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<(), &str> = Err("original error");
        let with_context = result.context("operation failed");

        assert!(matches!(with_context, Err(NscError::Other(_))));
        let msg = with_context.unwrap_err().to_string();
        assert!(msg.contains("operation failed"));
        assert!(msg.contains("original error"));
    }

    #[test]
    fn test_result_ext_ok_passthrough() {
        let result: Result<i32, &str> = Ok(42);
        assert_eq!(result.context("should not appear").unwrap(), 42);
    }

    #[test]
    fn test_option_ext_context() {
        let opt: Option<i32> = None;
        let result = opt.context("value was missing");

        assert!(matches!(result, Err(NscError::Other(_))));
        assert!(result.unwrap_err().to_string().contains("value was missing"));
    }

    #[test]
    fn test_option_ext_with_context() {
        let opt: Option<i32> = None;
        let result = opt.with_context(|| format!("missing value at index {}", 5));
        assert!(result.unwrap_err().to_string().contains("missing value at index 5"));
    }
}

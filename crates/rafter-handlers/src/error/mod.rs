//! Domain errors raised by handler operations.
//!
//! All errors use a `thiserror`-derived enum with structured context so
//! callers can inspect the failure programmatically. Lifecycle guard
//! violations and lookup misses are expected in normal control flow and are
//! meant to be caught; parameter codec failures indicate a malformed
//! reconstruction mapping. I/O errors raised during activation are wrapped
//! in `Arc` to satisfy the `result_large_err` Clippy lint.

use std::sync::Arc;

use thiserror::Error;

/// Errors arising from handler operations.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// An operation requiring an inactive handler was called while active.
    #[error("operation '{operation}' requires an inactive handler")]
    ActiveState {
        /// Name of the rejected operation.
        operation: String,
    },

    /// An operation requiring an active handler was called while inactive.
    #[error("operation '{operation}' requires an active handler")]
    InactiveState {
        /// Name of the rejected operation.
        operation: String,
    },

    /// Reconstruction parameters were captured from an active handler.
    ///
    /// Active handlers typically hold non-transportable resources such as
    /// open file handles, so capture is only legal while inactive.
    #[error("cannot capture reconstruction parameters of an active handler")]
    CaptureActive,

    /// The reconstruction parameters could not be serialised.
    #[error("failed to serialise reconstruction parameters: {0}")]
    SerializeParams(#[source] serde_json::Error),

    /// A reconstruction mapping could not be decoded into typed parameters.
    #[error("failed to decode reconstruction parameters: {message}")]
    DeserializeParams {
        /// Human-readable description of the decode failure.
        message: String,
        /// Optional underlying JSON error.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Constructor validation rejected the supplied parameters.
    #[error("invalid handler parameters: {message}")]
    InvalidParams {
        /// Description of the validation failure.
        message: String,
    },

    /// A metadata or table-name lookup missed.
    ///
    /// Raised instead of returning a sentinel so callers can distinguish
    /// "explicitly set to an empty value" from "not present".
    #[error("key '{key}' not found")]
    KeyNotFound {
        /// Key that was looked up.
        key: String,
    },

    /// A frame index was outside the handler's range.
    #[error("frame index {index} out of range for source of length {len}")]
    FrameOutOfRange {
        /// Index that was requested.
        index: usize,
        /// Number of frames the source holds.
        len: usize,
    },

    /// The handler failed to acquire its resources during activation.
    #[error("activation failed: {message}")]
    Activation {
        /// Description of the acquisition failure.
        message: String,
        /// Optional underlying I/O error.
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// A handler type could not be registered in a discovery catalog.
    #[error("catalog error: {message}")]
    Catalog {
        /// Description of the registration failure.
        message: String,
    },
}

#[cfg(test)]
mod tests;

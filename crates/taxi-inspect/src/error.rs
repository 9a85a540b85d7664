//! Inspector error types.

use thiserror::Error;

use taxi_protocol::ProtocolError;

/// Result type for inspector operations.
pub type InspectResult<T> = Result<T, InspectError>;

/// Errors that can occur in the inspector.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid combination of arguments.
    #[error("usage error: {0}")]
    Usage(String),

    /// Record failed to decode or build.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// JSON input or output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tracing could not be initialised.
    #[error("tracing error: {0}")]
    Tracing(#[from] crate::tracing::TracingError),
}

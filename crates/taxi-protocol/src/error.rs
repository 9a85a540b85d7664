//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding, decoding or framing records.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Fewer bytes remain than the field (or a length prefix) requires.
    #[error("truncated input in {field}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// The bytes are present but do not form a valid value.
    #[error("malformed encoding in {field}: {reason}")]
    MalformedEncoding { field: &'static str, reason: String },

    /// Empty, multi-character or otherwise unusable identifier.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Request subject outside the known enumeration.
    #[error("unknown request subject: {0}")]
    UnknownSubject(i32),

    /// Subject name that matches no known subject.
    #[error("unknown request subject name: {0:?}")]
    UnknownSubjectName(String),

    /// Status code outside every known family.
    #[error("unknown status code: {0}")]
    UnknownCode(i32),

    /// A builder was finished without a required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Frame exceeds maximum allowed size.
    #[error("frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: u32, max: u32 },

    /// Zero-length frame received.
    #[error("empty frame")]
    EmptyFrame,

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Returns true for errors caused by running out of input.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}

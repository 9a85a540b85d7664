//! Diagnostic log record.
//!
//! ```text
//! +------------+-----------------------+-------------------------+
//! | code (i32) | message (u32 + UTF-8) | timestamp (u32 + UTF-8) |
//! +------------+-----------------------+-------------------------+
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ProtocolResult};
use crate::status::{StatusCode, StatusFamily};
use crate::wire::{Reader, Writer};

/// One diagnostic event emitted by the simulation.
///
/// `timestamp` is RFC 3339 UTC at second precision, e.g.
/// `2024-01-01T00:00:00Z`. Decoding keeps the text as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLog")]
pub struct Log {
    code: i32,
    message: String,
    timestamp: String,
}

/// JSON shape of a [`Log`] before the code is checked.
#[derive(Deserialize)]
struct RawLog {
    code: i32,
    message: String,
    timestamp: String,
}

impl TryFrom<RawLog> for Log {
    type Error = ProtocolError;

    fn try_from(raw: RawLog) -> ProtocolResult<Self> {
        Self::from_raw(raw.code, raw.message, raw.timestamp)
    }
}

impl Log {
    /// Creates a log for a known status at the given instant.
    pub fn new(status: impl Into<StatusCode>, message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            code: status.into().code(),
            message: message.into(),
            timestamp: format_timestamp(at),
        }
    }

    /// Creates a log stamped with the current time.
    pub fn now(status: impl Into<StatusCode>, message: impl Into<String>) -> Self {
        Self::new(status, message, Utc::now())
    }

    /// Creates a log from raw parts, as a newer producer might send them.
    ///
    /// Any non-negative code is accepted, including codes this build does
    /// not know yet.
    pub fn from_raw(
        code: i32,
        message: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> ProtocolResult<Self> {
        if code < 0 {
            return Err(ProtocolError::UnknownCode(code));
        }
        Ok(Self {
            code,
            message: message.into(),
            timestamp: timestamp.into(),
        })
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Resolves the raw code against the known status tables.
    pub fn status(&self) -> ProtocolResult<StatusCode> {
        StatusCode::from_code(self.code)
    }

    /// Family the code falls in by range.
    pub fn family(&self) -> StatusFamily {
        // codes are never negative, see `from_raw` and `decode`
        StatusFamily::of(self.code).unwrap_or(StatusFamily::Message)
    }

    /// Parses the timestamp, if it is valid RFC 3339.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Encodes the record.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::with_capacity(12 + self.message.len() + self.timestamp.len());
        w.put_i32(self.code);
        w.put_str(&self.message);
        w.put_str(&self.timestamp);
        w.finish()
    }

    /// Decodes a record occupying the whole buffer.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        let mut r = Reader::new(bytes);
        let code = r.i32("log.code")?;
        let message = r.str("log.message")?;
        let timestamp = r.str("log.timestamp")?;
        r.finish("log")?;
        Self::from_raw(code, message, timestamp)
    }
}

/// Formats an instant the way logs carry it on the wire.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

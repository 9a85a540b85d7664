//! Entry points for callers that move records across a process boundary.
//!
//! Encoding a well-formed record cannot fail. Decoding either returns a
//! complete record or an error; partial records are never produced.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ProtocolResult;
use crate::log::Log;
use crate::map::Map;
use crate::message::Message;

/// Which container a buffer holds. The wire format is not tagged, so the
/// caller always says what it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Log,
    Map,
    Message,
}

impl RecordKind {
    /// Maps a broker topic to the record it carries (`logs`, `map`,
    /// `requests`).
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            "logs" => Some(Self::Log),
            "map" => Some(Self::Map),
            "requests" => Some(Self::Message),
            _ => None,
        }
    }

    /// Topic the record travels on.
    pub fn topic(self) -> &'static str {
        match self {
            Self::Log => "logs",
            Self::Map => "map",
            Self::Message => "requests",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Map => "map",
            Self::Message => "message",
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log" => Ok(Self::Log),
            "map" => Ok(Self::Map),
            "message" => Ok(Self::Message),
            other => Err(format!(
                "unknown record kind {other:?} (expected log, map or message)"
            )),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any container record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Log(Log),
    Map(Map),
    Message(Message),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Log(_) => RecordKind::Log,
            Self::Map(_) => RecordKind::Map,
            Self::Message(_) => RecordKind::Message,
        }
    }
}

impl From<Log> for Record {
    fn from(log: Log) -> Self {
        Self::Log(log)
    }
}

impl From<Map> for Record {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl From<Message> for Record {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

pub fn encode_log(log: &Log) -> Vec<u8> {
    log.encode()
}

pub fn decode_log(bytes: &[u8]) -> ProtocolResult<Log> {
    traced(RecordKind::Log, bytes, Log::decode(bytes))
}

pub fn encode_map(map: &Map) -> Vec<u8> {
    map.encode()
}

pub fn decode_map(bytes: &[u8]) -> ProtocolResult<Map> {
    traced(RecordKind::Map, bytes, Map::decode(bytes))
}

pub fn encode_message(message: &Message) -> Vec<u8> {
    message.encode()
}

pub fn decode_message(bytes: &[u8]) -> ProtocolResult<Message> {
    traced(RecordKind::Message, bytes, Message::decode(bytes))
}

/// Encodes any record.
pub fn encode(record: &Record) -> Vec<u8> {
    match record {
        Record::Log(log) => encode_log(log),
        Record::Map(map) => encode_map(map),
        Record::Message(message) => encode_message(message),
    }
}

/// Decodes a buffer as the given kind.
pub fn decode(kind: RecordKind, bytes: &[u8]) -> ProtocolResult<Record> {
    match kind {
        RecordKind::Log => decode_log(bytes).map(Record::Log),
        RecordKind::Map => decode_map(bytes).map(Record::Map),
        RecordKind::Message => decode_message(bytes).map(Record::Message),
    }
}

fn traced<T>(kind: RecordKind, bytes: &[u8], result: ProtocolResult<T>) -> ProtocolResult<T> {
    match &result {
        Ok(_) => tracing::trace!(%kind, len = bytes.len(), "decoded record"),
        Err(error) => tracing::debug!(%kind, len = bytes.len(), %error, "failed to decode record"),
    }
    result
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::message::Subject;
    use crate::status::ErrorCode;
    use crate::types::{Coordinate, Customer, Identifier};

    fn sample_log() -> Log {
        Log::new(
            ErrorCode::TaxiDisconnected,
            "taxi disconnected",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn facade_roundtrips_each_kind() {
        let log = sample_log();
        assert_eq!(decode_log(&encode_log(&log)).unwrap(), log);

        let c = Identifier::new('c').unwrap();
        let a = Identifier::new('a').unwrap();
        let map = Map::new().with_customer(Customer::new(c, Coordinate::new(1, 2), a));
        assert_eq!(decode_map(&encode_map(&map)).unwrap(), map);

        let message = Message::builder()
            .subject(Subject::ReturnToBase)
            .taxi_id(9)
            .build()
            .unwrap();
        assert_eq!(decode_message(&encode_message(&message)).unwrap(), message);
    }

    #[test]
    fn dynamic_decode_uses_requested_kind() {
        let record = Record::from(sample_log());
        let bytes = encode(&record);
        let decoded = decode(RecordKind::Log, &bytes).unwrap();
        assert_eq!(decoded.kind(), RecordKind::Log);
        assert_eq!(decoded, record);
    }

    #[test]
    fn wrong_kind_fails_cleanly() {
        let bytes = encode_log(&sample_log());
        assert!(decode(RecordKind::Message, &bytes).is_err());
        assert!(decode(RecordKind::Map, &bytes).is_err());
    }

    #[test]
    fn topics_map_to_kinds() {
        for kind in [RecordKind::Log, RecordKind::Map, RecordKind::Message] {
            assert_eq!(RecordKind::from_topic(kind.topic()), Some(kind));
            assert_eq!(kind.as_str().parse::<RecordKind>().unwrap(), kind);
        }
        assert_eq!(RecordKind::from_topic("metrics"), None);
        assert!("snapshot".parse::<RecordKind>().is_err());
    }

    #[test]
    fn record_serializes_as_inner_value() {
        let json = serde_json::to_string(&Record::from(sample_log())).unwrap();
        assert!(json.starts_with(r#"{"code":205"#));
    }
}

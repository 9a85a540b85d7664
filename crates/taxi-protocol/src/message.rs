//! Dispatch instruction sent to the simulation.
//!
//! ```text
//! +---------------+--------+---------------+-------------------+
//! | subject (i32) | id (1) | taxi_id (i16) | x (i32) | y (i32) |
//! +---------------+--------+---------------+-------------------+
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{Coordinate, Identifier, opt_id};
use crate::wire::{Reader, Writer};

const MESSAGE_SIZE: usize = 4 + 1 + 2 + 8;

/// What a [`Subject`] acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectTarget {
    Taxi,
    Customer,
    Location,
}

/// Kind of dispatch instruction. Wire values are the declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum Subject {
    /// Send a taxi to a coordinate.
    GoTo,
    /// Halt a taxi where it is.
    Stop,
    /// Resume a stopped taxi.
    Continue,
    ReturnToBase,
    DisconnectTaxi,
    DisconnectCustomer,
    /// Move a customer to the front of the queue.
    PrioritizeCustomer,
    /// Relocate a location to a new coordinate.
    MoveLocation,
}

impl Subject {
    /// Every subject, in wire order.
    pub const ALL: &'static [Subject] = &[
        Self::GoTo,
        Self::Stop,
        Self::Continue,
        Self::ReturnToBase,
        Self::DisconnectTaxi,
        Self::DisconnectCustomer,
        Self::PrioritizeCustomer,
        Self::MoveLocation,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a wire value.
    pub fn from_code(code: i32) -> ProtocolResult<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(ProtocolError::UnknownSubject(code))
    }

    pub fn target(self) -> SubjectTarget {
        match self {
            Self::GoTo | Self::Stop | Self::Continue | Self::ReturnToBase | Self::DisconnectTaxi => {
                SubjectTarget::Taxi
            }
            Self::DisconnectCustomer | Self::PrioritizeCustomer => SubjectTarget::Customer,
            Self::MoveLocation => SubjectTarget::Location,
        }
    }

    /// Whether the coordinate carries meaning for this subject.
    pub fn uses_coord(self) -> bool {
        matches!(self, Self::GoTo | Self::MoveLocation)
    }

    /// Kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::GoTo => "go-to",
            Self::Stop => "stop",
            Self::Continue => "continue",
            Self::ReturnToBase => "return-to-base",
            Self::DisconnectTaxi => "disconnect-taxi",
            Self::DisconnectCustomer => "disconnect-customer",
            Self::PrioritizeCustomer => "prioritize-customer",
            Self::MoveLocation => "move-location",
        }
    }
}

impl TryFrom<i32> for Subject {
    type Error = ProtocolError;

    fn try_from(code: i32) -> ProtocolResult<Self> {
        Self::from_code(code)
    }
}

impl From<Subject> for i32 {
    fn from(subject: Subject) -> Self {
        subject.code()
    }
}

/// Accepts either the kebab-case name or the wire value.
impl FromStr for Subject {
    type Err = ProtocolError;

    fn from_str(s: &str) -> ProtocolResult<Self> {
        if let Ok(code) = s.parse::<i32>() {
            return Self::from_code(code);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|subject| subject.name() == s)
            .ok_or_else(|| ProtocolError::UnknownSubjectName(s.to_string()))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single dispatch instruction.
///
/// Build one with [`Message::builder`]; decoded messages come straight from
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawMessage")]
pub struct Message {
    #[serde(rename = "code")]
    subject: Subject,
    /// Addressed customer or location; `None` for taxi instructions.
    #[serde(serialize_with = "opt_id::serialize")]
    id: Option<Identifier>,
    taxi_id: i16,
    coord: Coordinate,
}

/// JSON shape of a [`Message`]; it goes through [`MessageBuilder`] so the
/// same per-subject rules apply.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    code: Subject,
    #[serde(default, with = "opt_id")]
    id: Option<Identifier>,
    #[serde(default)]
    taxi_id: i16,
    #[serde(default)]
    coord: Option<Coordinate>,
}

impl TryFrom<RawMessage> for Message {
    type Error = ProtocolError;

    fn try_from(raw: RawMessage) -> ProtocolResult<Self> {
        MessageBuilder {
            subject: Some(raw.code),
            id: raw.id,
            taxi_id: raw.taxi_id,
            coord: raw.coord,
        }
        .build()
    }
}

impl Message {
    /// Starts a builder.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn id(&self) -> Option<Identifier> {
        self.id
    }

    pub fn taxi_id(&self) -> i16 {
        self.taxi_id
    }

    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    /// Encodes the record.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::with_capacity(MESSAGE_SIZE);
        w.put_i32(self.subject.code());
        w.put_opt_id(self.id);
        w.put_i16(self.taxi_id);
        w.put_coord(self.coord);
        w.finish()
    }

    /// Decodes a record occupying the whole buffer.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        let mut r = Reader::new(bytes);
        let subject = Subject::from_code(r.i32("message.subject")?)?;
        let id = r.opt_id("message.id")?;
        let taxi_id = r.i16("message.taxi_id")?;
        let coord = r.coord("message.coord")?;
        r.finish("message")?;
        Ok(Self {
            subject,
            id,
            taxi_id,
            coord,
        })
    }
}

/// Fluent builder for [`Message`].
///
/// `build` checks the fields against the subject: customer and location
/// instructions need an `id`, `GoTo` and `MoveLocation` need a coordinate.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    subject: Option<Subject>,
    id: Option<Identifier>,
    taxi_id: i16,
    coord: Option<Coordinate>,
}

impl MessageBuilder {
    pub fn subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn id(mut self, id: Identifier) -> Self {
        self.id = Some(id);
        self
    }

    pub fn taxi_id(mut self, taxi_id: i16) -> Self {
        self.taxi_id = taxi_id;
        self
    }

    pub fn coord(mut self, coord: Coordinate) -> Self {
        self.coord = Some(coord);
        self
    }

    /// Validates and freezes the message.
    pub fn build(self) -> ProtocolResult<Message> {
        let subject = self.subject.ok_or(ProtocolError::MissingField("subject"))?;

        if subject.target() != SubjectTarget::Taxi && self.id.is_none() {
            return Err(ProtocolError::MissingField("id"));
        }
        if subject.uses_coord() && self.coord.is_none() {
            return Err(ProtocolError::MissingField("coord"));
        }

        Ok(Message {
            subject,
            id: self.id,
            taxi_id: self.taxi_id,
            coord: self.coord.unwrap_or_default(),
        })
    }
}

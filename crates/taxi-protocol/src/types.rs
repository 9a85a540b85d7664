//! Value records embedded in map snapshots and dispatch messages.
//!
//! None of these has its own wire entry point; they are only encoded as part
//! of a [`Map`](crate::Map) or [`Message`](crate::Message).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ProtocolResult};
use crate::wire::NONE_ID;

/// Grid position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    /// Creates a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Single-character identifier of a location or customer.
///
/// Always one printable ASCII character other than `-`, which the wire
/// reserves for "no identifier".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(u8);

impl Identifier {
    /// Creates an identifier from a character.
    pub fn new(c: char) -> ProtocolResult<Self> {
        u8::try_from(c)
            .map_err(|_| ProtocolError::InvalidIdentifier(format!("{c:?}")))
            .and_then(Self::from_byte)
    }

    pub(crate) fn from_byte(b: u8) -> ProtocolResult<Self> {
        if b.is_ascii_graphic() && b != NONE_ID {
            Ok(Self(b))
        } else {
            Err(ProtocolError::InvalidIdentifier(format!("byte 0x{b:02x}")))
        }
    }

    /// Returns the identifier as a character.
    pub fn as_char(self) -> char {
        char::from(self.0)
    }

    /// Returns the wire byte.
    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl TryFrom<char> for Identifier {
    type Error = ProtocolError;

    fn try_from(c: char) -> ProtocolResult<Self> {
        Self::new(c)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = ProtocolError;

    fn try_from(s: &str) -> ProtocolResult<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(ProtocolError::InvalidIdentifier(format!("{s:?}"))),
        }
    }
}

impl TryFrom<String> for Identifier {
    type Error = ProtocolError;

    fn try_from(s: String) -> ProtocolResult<Self> {
        Self::try_from(s.as_str())
    }
}

impl FromStr for Identifier {
    type Err = ProtocolError;

    fn from_str(s: &str) -> ProtocolResult<Self> {
        Self::try_from(s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.as_char().to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Serde adapter for `Option<Identifier>` using the `-` placeholder for `None`,
/// the same convention the wire uses.
pub(crate) mod opt_id {
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::Identifier;
    use crate::wire::NONE_ID;

    pub fn serialize<S: Serializer>(id: &Option<Identifier>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_char(id.map_or(char::from(NONE_ID), Identifier::as_char))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Identifier>, D::Error> {
        let s = String::deserialize(d)?;
        if s.as_bytes() == [NONE_ID].as_slice() {
            return Ok(None);
        }
        Identifier::try_from(s.as_str())
            .map(Some)
            .map_err(de::Error::custom)
    }
}

/// Fixed point of interest on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Identifier,
    pub coord: Coordinate,
}

impl Location {
    /// Creates a location.
    pub fn new(id: Identifier, coord: Coordinate) -> Self {
        Self { id, coord }
    }
}

/// A customer and their pending trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Identifier,
    /// Current position.
    pub coord: Coordinate,
    /// Key of the [`Location`] the customer wants to reach.
    #[serde(rename = "location")]
    pub destination: Identifier,
    /// Currently riding in a taxi.
    pub onboard: bool,
    /// Waiting for pickup.
    pub in_queue: bool,
    /// Tick at which the customer next requests service.
    pub next_request: i32,
}

impl Customer {
    /// Creates a customer that is neither onboard nor queued.
    pub fn new(id: Identifier, coord: Coordinate, destination: Identifier) -> Self {
        Self {
            id,
            coord,
            destination,
            onboard: false,
            in_queue: false,
            next_request: 0,
        }
    }

    /// Builder: set onboard.
    pub fn with_onboard(mut self, onboard: bool) -> Self {
        self.onboard = onboard;
        self
    }

    /// Builder: set in_queue.
    pub fn with_in_queue(mut self, in_queue: bool) -> Self {
        self.in_queue = in_queue;
        self
    }

    /// Builder: set next_request.
    pub fn with_next_request(mut self, tick: i32) -> Self {
        self.next_request = tick;
        self
    }
}

/// A taxi and its client-connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxi {
    pub id: i16,
    /// Current position.
    pub coord: Coordinate,
    /// Current target.
    pub dest: Coordinate,
    /// Key of the carried or assigned [`Customer`], if any.
    #[serde(with = "opt_id")]
    pub customer: Option<Identifier>,
    pub connected: bool,
    pub ready: bool,
    pub stopped: bool,
    /// Accumulated idle ticks.
    pub wait_time: i32,
}

impl Taxi {
    /// Creates an idle, disconnected taxi whose destination is its position.
    pub fn new(id: i16, coord: Coordinate) -> Self {
        Self {
            id,
            coord,
            dest: coord,
            customer: None,
            connected: false,
            ready: false,
            stopped: false,
            wait_time: 0,
        }
    }

    /// Builder: set dest.
    pub fn with_dest(mut self, dest: Coordinate) -> Self {
        self.dest = dest;
        self
    }

    /// Builder: assign a customer.
    pub fn with_customer(mut self, customer: Identifier) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Builder: set connected.
    pub fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    /// Builder: set ready.
    pub fn with_ready(mut self, ready: bool) -> Self {
        self.ready = ready;
        self
    }

    /// Builder: set stopped.
    pub fn with_stopped(mut self, stopped: bool) -> Self {
        self.stopped = stopped;
        self
    }

    /// Builder: set wait_time.
    pub fn with_wait_time(mut self, ticks: i32) -> Self {
        self.wait_time = ticks;
        self
    }
}

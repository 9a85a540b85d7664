//! Binary wire codec for the taxi-dispatch simulation.
//!
//! Three container records cross the process boundary between the
//! simulation server and taxi clients:
//!
//! - [`Log`]: a diagnostic event tagged with a status code
//! - [`Map`]: a full snapshot of locations, customers and taxis
//! - [`Message`]: one dispatch instruction
//!
//! # Wire contract
//!
//! - Integers are little-endian two's complement: `i32`, except taxi ids
//!   which are `i16`.
//! - Strings are a `u32` byte count followed by UTF-8 bytes.
//! - Sequences are a `u32` element count followed by fixed-size elements.
//! - Booleans are one byte, `0` or `1`.
//! - Identifiers are one ASCII byte; `-` means "none".
//!
//! Buffers are not self-tagged: the caller knows which record it expects
//! (the broker topic tells it) and picks the matching decoder.
//!
//! # Example
//!
//! ```rust
//! use taxi_protocol::{Coordinate, Message, Subject, decode_message, encode_message};
//!
//! let message = Message::builder()
//!     .subject(Subject::GoTo)
//!     .taxi_id(3)
//!     .coord(Coordinate::new(4, 5))
//!     .build()
//!     .unwrap();
//! let bytes = encode_message(&message);
//! assert_eq!(decode_message(&bytes).unwrap(), message);
//! ```

mod codec;
mod error;
mod framing;
mod log;
mod map;
mod message;
mod status;
mod types;
mod wire;

pub use codec::{
    Record, RecordKind, decode, decode_log, decode_map, decode_message, encode, encode_log,
    encode_map, encode_message,
};
pub use error::{ProtocolError, ProtocolResult};
pub use framing::{FrameReader, FrameWriter, decode_frame, encode_frame};
pub use log::{Log, format_timestamp};
pub use map::{DanglingReference, Map};
pub use message::{Message, MessageBuilder, Subject, SubjectTarget};
pub use status::{
    ErrorCode, MessageCode, StatusCode, StatusFamily, WarningCode, error_codes, message_codes,
    warning_codes,
};
pub use types::{Coordinate, Customer, Identifier, Location, Taxi};
pub use wire::NONE_ID;

/// Maximum frame size (1 MB).
pub const MAX_FRAME_SIZE: u32 = 1024 * 1024;

//! Status codes carried by [`Log`](crate::Log) records.
//!
//! Three closed families share one integer space by fixed offset:
//!
//! ```text
//! MESSAGE  [0, 100)
//! WARNING  [100, 200)
//! ERROR    [200, ..)
//! ```
//!
//! Codes are positional: new values go at the end of their family. Removing
//! or reordering a value renumbers everything after it and breaks every
//! deployed consumer.

use std::fmt;

use crate::error::{ProtocolError, ProtocolResult};

macro_rules! status_family {
    (
        $(#[$meta:meta])*
        $name:ident, offset = $offset:expr;
        $( $(#[$vmeta:meta])* $variant:ident => $desc:literal, )+
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(i32)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// First raw code of this family.
            pub const OFFSET: i32 = $offset;

            /// Every value, in code order.
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// Raw code with the family offset applied.
            pub fn code(self) -> i32 {
                Self::OFFSET + self as i32
            }

            /// Looks up a raw code, returning `None` outside this family.
            pub fn from_code(code: i32) -> Option<Self> {
                let index = usize::try_from(code.checked_sub(Self::OFFSET)?).ok()?;
                Self::ALL.get(index).copied()
            }

            /// Short human-readable description.
            pub fn description(self) -> &'static str {
                match self {
                    $( $name::$variant => $desc, )+
                }
            }
        }
    };
}

status_family! {
    /// Informational events.
    MessageCode, offset = 0;
    ServerStarted => "server started",
    MapLoaded => "map loaded",
    TaxiConnected => "taxi connected",
    TaxiReconnected => "taxi reconnected",
    CustomerRequested => "customer requested a taxi",
    CustomerPickedUp => "customer picked up",
    CustomerDroppedOff => "customer dropped off",
    TaxiStopped => "taxi stopped",
    TaxiResumed => "taxi resumed",
    TaxiReturningToBase => "taxi returning to base",
    LocationMoved => "location moved",
    ServerShutdown => "server shutting down",
}

status_family! {
    /// Recoverable anomalies.
    WarningCode, offset = 100;
    TaxiIdle => "taxi idle",
    UnknownTaxi => "unknown taxi",
    UnknownCustomer => "unknown customer",
    UnknownLocation => "unknown location",
    CoordinateOutOfBounds => "coordinate out of bounds",
    CustomerAlreadyOnboard => "customer already onboard",
    RequestIgnored => "request ignored",
}

status_family! {
    /// Failures.
    ErrorCode, offset = 200;
    BrokerUnavailable => "broker unavailable",
    MalformedMessage => "malformed message",
    MapCorrupted => "map corrupted",
    TaxiLimitReached => "taxi limit reached",
    CustomerLimitReached => "customer limit reached",
    TaxiDisconnected => "taxi disconnected",
    CustomerDisconnected => "customer disconnected",
}

/// The three status-code families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFamily {
    Message,
    Warning,
    Error,
}

impl StatusFamily {
    /// Classifies a raw code by range. Negative codes belong to no family.
    pub fn of(code: i32) -> Option<Self> {
        match code {
            c if c >= ErrorCode::OFFSET => Some(Self::Error),
            c if c >= WarningCode::OFFSET => Some(Self::Warning),
            c if c >= MessageCode::OFFSET => Some(Self::Message),
            _ => None,
        }
    }

    /// First raw code of the family.
    pub fn offset(self) -> i32 {
        match self {
            Self::Message => MessageCode::OFFSET,
            Self::Warning => WarningCode::OFFSET,
            Self::Error => ErrorCode::OFFSET,
        }
    }

    /// Raw codes of every known value in the family, in enumeration order.
    pub fn codes(self) -> Vec<i32> {
        match self {
            Self::Message => MessageCode::ALL.iter().map(|c| c.code()).collect(),
            Self::Warning => WarningCode::ALL.iter().map(|c| c.code()).collect(),
            Self::Error => ErrorCode::ALL.iter().map(|c| c.code()).collect(),
        }
    }

    /// Lowercase family name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StatusFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known status value from any family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Message(MessageCode),
    Warning(WarningCode),
    Error(ErrorCode),
}

impl StatusCode {
    /// Resolves a raw code: range test picks the family, then the offset is
    /// subtracted to find the value.
    pub fn from_code(code: i32) -> ProtocolResult<Self> {
        let status = match StatusFamily::of(code) {
            Some(StatusFamily::Message) => MessageCode::from_code(code).map(Self::Message),
            Some(StatusFamily::Warning) => WarningCode::from_code(code).map(Self::Warning),
            Some(StatusFamily::Error) => ErrorCode::from_code(code).map(Self::Error),
            None => None,
        };
        status.ok_or(ProtocolError::UnknownCode(code))
    }

    /// Raw code with the family offset applied.
    pub fn code(self) -> i32 {
        match self {
            Self::Message(c) => c.code(),
            Self::Warning(c) => c.code(),
            Self::Error(c) => c.code(),
        }
    }

    pub fn family(self) -> StatusFamily {
        match self {
            Self::Message(_) => StatusFamily::Message,
            Self::Warning(_) => StatusFamily::Warning,
            Self::Error(_) => StatusFamily::Error,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Message(c) => c.description(),
            Self::Warning(c) => c.description(),
            Self::Error(c) => c.description(),
        }
    }
}

impl From<MessageCode> for StatusCode {
    fn from(code: MessageCode) -> Self {
        Self::Message(code)
    }
}

impl From<WarningCode> for StatusCode {
    fn from(code: WarningCode) -> Self {
        Self::Warning(code)
    }
}

impl From<ErrorCode> for StatusCode {
    fn from(code: ErrorCode) -> Self {
        Self::Error(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:03}] {}", self.code(), self.description())
    }
}

/// Raw codes of the MESSAGE family.
pub fn message_codes() -> Vec<i32> {
    StatusFamily::Message.codes()
}

/// Raw codes of the WARNING family.
pub fn warning_codes() -> Vec<i32> {
    StatusFamily::Warning.codes()
}

/// Raw codes of the ERROR family.
pub fn error_codes() -> Vec<i32> {
    StatusFamily::Error.codes()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn assert_contiguous(codes: &[i32], offset: i32) {
        assert!(!codes.is_empty());
        for (i, code) in codes.iter().enumerate() {
            assert_eq!(*code, offset + i as i32);
        }
    }

    #[test]
    fn families_are_contiguous_from_their_offset() {
        assert_contiguous(&message_codes(), 0);
        assert_contiguous(&warning_codes(), 100);
        assert_contiguous(&error_codes(), 200);
    }

    #[test]
    fn families_are_disjoint() {
        let messages: HashSet<_> = message_codes().into_iter().collect();
        let warnings: HashSet<_> = warning_codes().into_iter().collect();
        let errors: HashSet<_> = error_codes().into_iter().collect();
        assert!(messages.is_disjoint(&warnings));
        assert!(messages.is_disjoint(&errors));
        assert!(warnings.is_disjoint(&errors));
    }

    #[test]
    fn families_fit_their_ranges() {
        assert!(message_codes().iter().all(|c| (0..100).contains(c)));
        assert!(warning_codes().iter().all(|c| (100..200).contains(c)));
        assert!(error_codes().iter().all(|c| *c >= 200));
    }

    #[test]
    fn taxi_disconnected_is_205() {
        assert_eq!(ErrorCode::TaxiDisconnected.code(), 205);
        assert_eq!(
            StatusCode::from_code(205).unwrap(),
            StatusCode::Error(ErrorCode::TaxiDisconnected)
        );
    }

    #[test]
    fn every_code_resolves_back_to_itself() {
        for family in [StatusFamily::Message, StatusFamily::Warning, StatusFamily::Error] {
            for code in family.codes() {
                let status = StatusCode::from_code(code).unwrap();
                assert_eq!(status.code(), code);
                assert_eq!(status.family(), family);
            }
        }
    }

    #[test]
    fn unassigned_codes_are_unknown() {
        for code in [-1, 99, 150, 199, 999] {
            assert!(matches!(
                StatusCode::from_code(code),
                Err(ProtocolError::UnknownCode(c)) if c == code
            ));
        }
    }

    #[test]
    fn family_of_follows_ranges() {
        assert_eq!(StatusFamily::of(-5), None);
        assert_eq!(StatusFamily::of(0), Some(StatusFamily::Message));
        assert_eq!(StatusFamily::of(99), Some(StatusFamily::Message));
        assert_eq!(StatusFamily::of(100), Some(StatusFamily::Warning));
        assert_eq!(StatusFamily::of(199), Some(StatusFamily::Warning));
        assert_eq!(StatusFamily::of(200), Some(StatusFamily::Error));
        assert_eq!(StatusFamily::of(i32::MAX), Some(StatusFamily::Error));
    }

    #[test]
    fn status_display_pads_code() {
        assert_eq!(
            StatusCode::from(MessageCode::MapLoaded).to_string(),
            "[001] map loaded"
        );
        assert_eq!(
            StatusCode::from(WarningCode::UnknownLocation).to_string(),
            "[103] unknown location"
        );
    }
}

//! Core identifier types for the helpdesk.
//!
//! Tickets, users, and staff are addressed by positive 64-bit integers handed
//! out by per-entity sequences in the store. Each kind gets its own newtype so
//! a `StaffId` can never be passed where a `UserId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create an identifier from its raw value.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Return the raw value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Return the big-endian byte encoding, used for ordered storage keys.
            #[must_use]
            pub const fn to_be_bytes(self) -> [u8; 8] {
                self.0.to_be_bytes()
            }

            /// Decode an identifier from its big-endian byte encoding.
            #[must_use]
            pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
                Self(u64::from_be_bytes(bytes))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(IdError::Empty);
                }
                trimmed
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| IdError::InvalidNumber(s.to_string()))
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

numeric_id!(
    /// Identifier of a ticket.
    TicketId
);

numeric_id!(
    /// Identifier of an end user who can raise tickets.
    ///
    /// Users are owned by an external identity system; the helpdesk only
    /// keeps a display name alongside the id.
    UserId
);

numeric_id!(
    /// Identifier of a staff member who can raise and be assigned tickets.
    StaffId
);

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input was empty.
    #[error("identifier is empty")]
    Empty,

    /// The input is not an unsigned integer.
    #[error("invalid identifier: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ticket_id() {
        let id: TicketId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            "abc".parse::<StaffId>(),
            Err(IdError::InvalidNumber(_))
        ));
        assert!(matches!("-1".parse::<UserId>(), Err(IdError::InvalidNumber(_))));
        assert_eq!("  ".parse::<TicketId>(), Err(IdError::Empty));
    }

    #[test]
    fn byte_encoding_sorts_numerically() {
        let small = TicketId::new(2).to_be_bytes();
        let large = TicketId::new(256).to_be_bytes();
        assert!(small < large);
        assert_eq!(TicketId::from_be_bytes(large), TicketId::new(256));
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&UserId::new(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, UserId::new(7));
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", StaffId::new(3)), "StaffId(3)");
    }
}

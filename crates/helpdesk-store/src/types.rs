//! Domain types stored in the database.
//!
//! These types represent the persisted state of tickets, their raised-by and
//! assigned-to associations, and the users and staff they reference.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use helpdesk_core::{StaffId, TicketId, UserId};
use serde::{Deserialize, Serialize};

/// An end user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
}

/// A staff member record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Unique identifier for the staff member.
    pub staff_id: StaffId,
    /// Display name.
    pub name: String,
}

/// A ticket record stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier for the ticket.
    pub ticket_id: TicketId,
    /// Free-form category, e.g. "hardware".
    pub ticket_type: String,
    /// Description of the problem.
    pub description: String,
    /// Current lifecycle status.
    pub status: TicketStatus,
    /// Priority.
    pub priority: TicketPriority,
    /// Creation timestamp. Never changes after creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every status or assignment change.
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TicketStatus {
    /// Newly raised, nobody working on it yet.
    Open = 1,
    /// Assigned and being worked on.
    InProgress = 2,
    /// Fix delivered.
    Resolved = 3,
    /// Done.
    Closed = 4,
}

impl TicketStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    /// Convert the status to its numeric representation.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Try to convert a numeric value to a `TicketStatus`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Open),
            2 => Some(Self::InProgress),
            3 => Some(Self::Resolved),
            4 => Some(Self::Closed),
            _ => None,
        }
    }

    /// The wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// Priority of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TicketPriority {
    /// Can wait.
    Low = 1,
    /// Default when the reporter does not say.
    #[default]
    Medium = 2,
    /// Needs attention first.
    High = 3,
}

impl TicketPriority {
    /// Every priority, in declaration order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Convert the priority to its numeric representation.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Try to convert a numeric value to a `TicketPriority`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    /// The wire name of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

/// Returned when parsing a status or priority name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Who raised a ticket: exactly one user or one staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Raiser {
    /// Raised by an end user.
    User(UserId),
    /// Raised by a staff member.
    Staff(StaffId),
}

impl Raiser {
    /// The kind of party that raised the ticket.
    #[must_use]
    pub const fn kind(&self) -> RaiserKind {
        match self {
            Self::User(_) => RaiserKind::User,
            Self::Staff(_) => RaiserKind::Staff,
        }
    }

    /// The raw id of the raiser, regardless of kind.
    #[must_use]
    pub const fn raw_id(&self) -> u64 {
        match self {
            Self::User(id) => id.get(),
            Self::Staff(id) => id.get(),
        }
    }
}

/// Discriminant of a [`Raiser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RaiserKind {
    /// An end user.
    User,
    /// A staff member.
    Staff,
}

impl RaiserKind {
    /// The wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Staff => "STAFF",
        }
    }
}

/// Association recording who raised a ticket. One per ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaisedBy {
    /// The ticket this record belongs to.
    pub ticket_id: TicketId,
    /// The party that raised it.
    pub raiser: Raiser,
    /// Optimistic concurrency stamp, starts at 1.
    pub version: u64,
}

/// Association recording which staff member currently owns a ticket.
///
/// Re-assignment overwrites `staff_id` in place and bumps `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedTo {
    /// The ticket this record belongs to.
    pub ticket_id: TicketId,
    /// The current assignee.
    pub staff_id: StaffId,
    /// Optimistic concurrency stamp, starts at 1.
    pub version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_roundtrip() {
        for status in TicketStatus::ALL {
            assert_eq!(status.as_str().parse::<TicketStatus>().unwrap(), status);
            assert_eq!(TicketStatus::from_u8(status.as_u8()), Some(status));
        }
        assert!("in_progress".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(TicketPriority::default(), TicketPriority::Medium);
        assert_eq!("HIGH".parse::<TicketPriority>().unwrap(), TicketPriority::High);
        let err = "URGENT".parse::<TicketPriority>().unwrap_err();
        assert_eq!(err.to_string(), "unknown priority: URGENT");
    }

    #[test]
    fn raiser_kind() {
        let raiser = Raiser::User(UserId::new(42));
        assert_eq!(raiser.kind(), RaiserKind::User);
        assert_eq!(raiser.raw_id(), 42);
        assert_eq!(Raiser::Staff(StaffId::new(7)).kind().as_str(), "STAFF");
    }
}

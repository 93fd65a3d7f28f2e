//! Error types for the ticket desk.
//!
//! Every variant's `Display` output is the human-readable message returned to
//! API callers, so keep them short and free of internal detail.

use helpdesk_core::{StaffId, TicketId, UserId};
use helpdesk_store::StoreError;
use thiserror::Error;

/// A result type using `DeskError`.
pub type Result<T> = std::result::Result<T, DeskError>;

/// Errors that can occur in ticket desk operations.
#[derive(Debug, Error)]
pub enum DeskError {
    /// Required fields are missing or contradict each other.
    #[error("{0}")]
    InvalidRequest(String),

    /// The requested ticket was not found.
    #[error("Ticket not found")]
    TicketNotFound(TicketId),

    /// The referenced user was not found.
    #[error("User not found")]
    UserNotFound(UserId),

    /// The referenced staff member was not found.
    #[error("Staff not found")]
    StaffNotFound(StaffId),

    /// Another request changed the ticket's associations first.
    #[error("Ticket {ticket_id} was modified concurrently")]
    Conflict {
        /// The contended ticket.
        ticket_id: TicketId,
    },

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl DeskError {
    /// Shorthand for [`DeskError::InvalidRequest`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Map a store error from a write on `ticket_id`, turning lost races into `Conflict`.
    #[must_use]
    pub fn from_write(ticket_id: TicketId, err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { .. } | StoreError::AlreadyExists => {
                Self::Conflict { ticket_id }
            }
            StoreError::NotFound => Self::TicketNotFound(ticket_id),
            other => Self::Store(other),
        }
    }
}

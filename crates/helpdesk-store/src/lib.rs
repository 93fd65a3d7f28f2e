//! `RocksDB` storage layer for the helpdesk ticket service.
//!
//! This crate provides persistent storage for tickets, their raised-by and
//! assigned-to associations, users, and staff, using `RocksDB` with column
//! families for secondary indexes.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `tickets`: Primary ticket records, keyed by `ticket_id`
//! - `tickets_by_status` / `tickets_by_priority`: Indexes for filtering
//! - `raised_by`: Who raised each ticket, keyed by `ticket_id`
//! - `raised_by_user` / `raised_by_staff`: Indexes for "raised by X" lookups
//! - `assigned_to`: Current assignee of each ticket, keyed by `ticket_id`
//! - `assigned_to_staff`: Index for "assigned to X" lookups
//! - `users` / `staff`: Directory records
//! - `sequences`: Id counters
//!
//! Writes that touch more than one record go through a single `WriteBatch`,
//! so a reader never sees a ticket without its raised-by record or an
//! assignment without the matching ticket status.
//!
//! # Example
//!
//! ```no_run
//! use helpdesk_store::{RocksStore, Store};
//! use helpdesk_core::StaffId;
//!
//! let store = RocksStore::open("/tmp/helpdesk-db").unwrap();
//!
//! // Tickets currently assigned to staff member 7
//! let assigned = store.list_assignments_by_staff(StaffId::new(7)).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;
pub mod types;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;
pub use types::{
    AssignedTo, RaisedBy, Raiser, RaiserKind, Staff, Ticket, TicketPriority, TicketStatus,
    UnknownVariant, User,
};

use helpdesk_core::{StaffId, TicketId, UserId};

/// Id sequences maintained by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    /// Ticket ids.
    Tickets,
    /// User ids.
    Users,
    /// Staff ids.
    Staff,
}

impl Sequence {
    /// Storage key of the sequence counter.
    #[must_use]
    pub const fn key(self) -> &'static [u8] {
        match self {
            Self::Tickets => b"tickets",
            Self::Users => b"users",
            Self::Staff => b"staff",
        }
    }
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Sequences
    // =========================================================================

    /// Allocate the next id from a sequence. The first id handed out is 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn next_id(&self, sequence: Sequence) -> Result<u64>;

    // =========================================================================
    // Ticket Operations
    // =========================================================================

    /// Insert a new ticket together with its raised-by record.
    ///
    /// Both records and all their index entries are written in one batch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the ticket id is taken, or
    /// `StoreError::VersionConflict` if a raised-by record already exists for it.
    fn create_ticket(&self, ticket: &Ticket, raised_by: &RaisedBy) -> Result<()>;

    /// Get a ticket by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_ticket(&self, ticket_id: TicketId) -> Result<Option<Ticket>>;

    /// Overwrite an existing ticket, keeping the status and priority indexes in step.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the ticket doesn't exist.
    fn put_ticket(&self, ticket: &Ticket) -> Result<()>;

    /// List every ticket in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_all_tickets(&self) -> Result<Vec<Ticket>>;

    /// List all tickets with a given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_tickets_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>>;

    /// List all tickets with a given priority.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_tickets_by_priority(&self, priority: TicketPriority) -> Result<Vec<Ticket>>;

    // =========================================================================
    // Raised-By Operations
    // =========================================================================

    /// Get the raised-by record of a ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_raised_by(&self, ticket_id: TicketId) -> Result<Option<RaisedBy>>;

    /// List raised-by records whose raiser is the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_raised_by_user(&self, user_id: UserId) -> Result<Vec<RaisedBy>>;

    /// List raised-by records whose raiser is the given staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_raised_by_staff(&self, staff_id: StaffId) -> Result<Vec<RaisedBy>>;

    // =========================================================================
    // Assigned-To Operations
    // =========================================================================

    /// Get the current assignment of a ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_assignment(&self, ticket_id: TicketId) -> Result<Option<AssignedTo>>;

    /// Create or overwrite the assignment of `ticket` and save `ticket` in the same batch.
    ///
    /// `expected_version` is the version the caller read (`None` if there was no
    /// assignment). The written record carries the next version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::VersionConflict` if the stored version differs from
    /// `expected_version`, or `StoreError::NotFound` if the ticket doesn't exist.
    fn save_assignment(
        &self,
        ticket: &Ticket,
        staff_id: StaffId,
        expected_version: Option<u64>,
    ) -> Result<AssignedTo>;

    /// List assignments held by the given staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_assignments_by_staff(&self, staff_id: StaffId) -> Result<Vec<AssignedTo>>;

    // =========================================================================
    // Directory Operations
    // =========================================================================

    /// Insert or update a user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: UserId) -> Result<Option<User>>;

    /// Insert or update a staff record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_staff(&self, staff: &Staff) -> Result<()>;

    /// Get a staff member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_staff(&self, staff_id: StaffId) -> Result<Option<Staff>>;
}

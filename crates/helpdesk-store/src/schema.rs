//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary ticket records, keyed by `ticket_id`.
    pub const TICKETS: &str = "tickets";

    /// Index: tickets by status, keyed by `status || ticket_id`.
    pub const TICKETS_BY_STATUS: &str = "tickets_by_status";

    /// Index: tickets by priority, keyed by `priority || ticket_id`.
    pub const TICKETS_BY_PRIORITY: &str = "tickets_by_priority";

    /// Raised-by associations, keyed by `ticket_id`.
    pub const RAISED_BY: &str = "raised_by";

    /// Index: raised-by records by user, keyed by `user_id || ticket_id`.
    pub const RAISED_BY_USER: &str = "raised_by_user";

    /// Index: raised-by records by staff, keyed by `staff_id || ticket_id`.
    pub const RAISED_BY_STAFF: &str = "raised_by_staff";

    /// Assigned-to associations, keyed by `ticket_id`.
    pub const ASSIGNED_TO: &str = "assigned_to";

    /// Index: assignments by staff, keyed by `staff_id || ticket_id`.
    pub const ASSIGNED_TO_STAFF: &str = "assigned_to_staff";

    /// User records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Staff records, keyed by `staff_id`.
    pub const STAFF: &str = "staff";

    /// Id sequences, keyed by sequence name.
    pub const SEQUENCES: &str = "sequences";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::TICKETS,
        cf::TICKETS_BY_STATUS,
        cf::TICKETS_BY_PRIORITY,
        cf::RAISED_BY,
        cf::RAISED_BY_USER,
        cf::RAISED_BY_STAFF,
        cf::ASSIGNED_TO,
        cf::ASSIGNED_TO_STAFF,
        cf::USERS,
        cf::STAFF,
        cf::SEQUENCES,
    ]
}

//! Request and view types for ticket desk operations.

use helpdesk_core::{StaffId, UserId};
use helpdesk_store::{AssignedTo, RaisedBy, RaiserKind, Staff, Ticket, TicketPriority, User};
use serde::{Deserialize, Serialize};

/// Request to raise a new ticket.
///
/// Exactly one of `user_id` / `staff_id` must be set; the desk rejects the
/// request otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    /// Free-form category.
    pub ticket_type: String,
    /// Description of the problem.
    pub description: String,
    /// Priority. Defaults to `Medium`.
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    /// Raising user, if raised by a user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Raising staff member, if raised by staff.
    #[serde(default)]
    pub staff_id: Option<StaffId>,
}

impl CreateTicketRequest {
    /// A request raised by a user, with default priority.
    #[must_use]
    pub fn raised_by_user(
        ticket_type: impl Into<String>,
        description: impl Into<String>,
        user_id: UserId,
    ) -> Self {
        Self {
            ticket_type: ticket_type.into(),
            description: description.into(),
            priority: None,
            user_id: Some(user_id),
            staff_id: None,
        }
    }

    /// A request raised by a staff member, with default priority.
    #[must_use]
    pub fn raised_by_staff(
        ticket_type: impl Into<String>,
        description: impl Into<String>,
        staff_id: StaffId,
    ) -> Self {
        Self {
            ticket_type: ticket_type.into(),
            description: description.into(),
            priority: None,
            user_id: None,
            staff_id: Some(staff_id),
        }
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Read model joining a ticket with its raiser and assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketView {
    /// The ticket itself.
    pub ticket: Ticket,
    /// Who raised it, when the raiser record resolves.
    pub raised_by: Option<RaiserView>,
    /// Who it is assigned to, when assigned.
    pub assigned_to: Option<AssigneeView>,
}

/// Display fields of a ticket's raiser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaiserView {
    /// User or staff.
    pub kind: RaiserKind,
    /// Id of the user or staff member.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// Display fields of a ticket's assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssigneeView {
    /// Assigned staff member.
    pub staff_id: StaffId,
    /// Display name.
    pub name: String,
}

/// A raised-by record with the ticket and raiser it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaisedByDetails {
    /// The association record.
    pub record: RaisedBy,
    /// The ticket it belongs to.
    pub ticket: Ticket,
    /// The raising user, when raised by a user that still resolves.
    pub user: Option<User>,
    /// The raising staff member, when raised by staff that still resolves.
    pub staff: Option<Staff>,
}

/// An assignment with the ticket and staff member it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentDetails {
    /// The association record.
    pub record: AssignedTo,
    /// The assigned ticket.
    pub ticket: Ticket,
    /// The assignee, when the staff record resolves.
    pub staff: Option<Staff>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_builders() {
        let req = CreateTicketRequest::raised_by_user("hardware", "laptop broken", UserId::new(42));
        assert_eq!(req.user_id, Some(UserId::new(42)));
        assert!(req.staff_id.is_none());
        assert!(req.priority.is_none());

        let req = CreateTicketRequest::raised_by_staff("network", "vpn down", StaffId::new(7))
            .with_priority(TicketPriority::High);
        assert_eq!(req.staff_id, Some(StaffId::new(7)));
        assert_eq!(req.priority, Some(TicketPriority::High));
    }
}

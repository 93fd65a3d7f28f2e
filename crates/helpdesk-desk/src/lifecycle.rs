//! Ticket lifecycle: raising, assignment, and status changes.
//!
//! # State Machine
//!
//! ```text
//!        create                 assign (from any state)
//!   ───────────▶ Open ─────────────────────────────▶ InProgress
//!
//!   update_status: any of {Open, InProgress, Resolved, Closed}
//!                  may follow any other, including Closed → Open.
//! ```
//!
//! There are no enforced edges. Assignment always forces `InProgress`, even
//! over `Resolved` or `Closed`; [`status_after_assignment`] and
//! [`is_valid_transition`] are the two places to change if that ever needs
//! tightening.

use chrono::Utc;
use helpdesk_core::{StaffId, TicketId, UserId};
use helpdesk_store::{AssignedTo, RaisedBy, Raiser, Sequence, Store, Ticket, TicketStatus};

use crate::error::{DeskError, Result};
use crate::types::CreateTicketRequest;

/// Check if a status change is allowed. Every change currently is.
#[must_use]
pub const fn is_valid_transition(_from: TicketStatus, _to: TicketStatus) -> bool {
    true
}

/// The status a ticket takes when it is assigned.
#[must_use]
pub const fn status_after_assignment(_current: TicketStatus) -> TicketStatus {
    TicketStatus::InProgress
}

/// Turn the optional user/staff pair of a request into a single raiser.
///
/// # Errors
///
/// Returns `DeskError::InvalidRequest` if both or neither are set.
pub fn resolve_raiser(user_id: Option<UserId>, staff_id: Option<StaffId>) -> Result<Raiser> {
    match (user_id, staff_id) {
        (Some(user_id), None) => Ok(Raiser::User(user_id)),
        (None, Some(staff_id)) => Ok(Raiser::Staff(staff_id)),
        (Some(_), Some(_)) => Err(DeskError::invalid(
            "Ticket can be raised by either a user or staff, not both",
        )),
        (None, None) => Err(DeskError::invalid(
            "Ticket must be raised by either a user or staff",
        )),
    }
}

/// Raise a new ticket.
///
/// The ticket starts `Open` with `Medium` priority unless one is given, and is
/// written together with its raised-by record. Nothing is written on failure.
///
/// # Errors
///
/// Returns an error if:
/// - both or neither raiser ids are set
/// - the referenced user or staff member does not exist
/// - the store rejects the write
pub fn create_ticket<S: Store>(store: &S, request: CreateTicketRequest) -> Result<(Ticket, RaisedBy)> {
    let raiser = resolve_raiser(request.user_id, request.staff_id)?;

    // Resolve the raiser before allocating an id
    match raiser {
        Raiser::User(user_id) => {
            store
                .get_user(user_id)?
                .ok_or(DeskError::UserNotFound(user_id))?;
        }
        Raiser::Staff(staff_id) => {
            store
                .get_staff(staff_id)?
                .ok_or(DeskError::StaffNotFound(staff_id))?;
        }
    }

    let ticket_id = TicketId::new(store.next_id(Sequence::Tickets)?);
    let now = Utc::now();

    let ticket = Ticket {
        ticket_id,
        ticket_type: request.ticket_type,
        description: request.description,
        status: TicketStatus::Open,
        priority: request.priority.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };
    let raised_by = RaisedBy {
        ticket_id,
        raiser,
        version: 1,
    };

    store
        .create_ticket(&ticket, &raised_by)
        .map_err(|e| DeskError::from_write(ticket_id, e))?;

    Ok((ticket, raised_by))
}

/// Assign a ticket to a staff member, replacing any previous assignee.
///
/// The assignment and the forced `InProgress` status are committed together.
///
/// # Errors
///
/// Returns an error if:
/// - the ticket or staff member does not exist
/// - another assignment of the same ticket landed in between (`Conflict`)
pub fn assign_ticket<S: Store>(
    store: &S,
    ticket_id: TicketId,
    staff_id: StaffId,
) -> Result<(Ticket, AssignedTo)> {
    let mut ticket = store
        .get_ticket(ticket_id)?
        .ok_or(DeskError::TicketNotFound(ticket_id))?;

    store
        .get_staff(staff_id)?
        .ok_or(DeskError::StaffNotFound(staff_id))?;

    let expected_version = store.get_assignment(ticket_id)?.map(|a| a.version);

    ticket.status = status_after_assignment(ticket.status);
    ticket.updated_at = Utc::now();

    let assignment = store
        .save_assignment(&ticket, staff_id, expected_version)
        .map_err(|e| DeskError::from_write(ticket_id, e))?;

    Ok((ticket, assignment))
}

/// Set a ticket's status. Returns the updated ticket and the status it had before.
///
/// # Errors
///
/// Returns `DeskError::TicketNotFound` if the ticket does not exist.
pub fn update_status<S: Store>(
    store: &S,
    ticket_id: TicketId,
    status: TicketStatus,
) -> Result<(Ticket, TicketStatus)> {
    let mut ticket = store
        .get_ticket(ticket_id)?
        .ok_or(DeskError::TicketNotFound(ticket_id))?;

    let previous = ticket.status;
    if !is_valid_transition(previous, status) {
        return Err(DeskError::invalid(format!(
            "Cannot move ticket from {previous} to {status}"
        )));
    }

    ticket.status = status;
    ticket.updated_at = Utc::now();
    store
        .put_ticket(&ticket)
        .map_err(|e| DeskError::from_write(ticket_id, e))?;

    Ok((ticket, previous))
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_store::{RocksStore, Staff, TicketPriority, User};
    use tempfile::TempDir;

    fn setup() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        store
            .put_user(&User {
                user_id: UserId::new(42),
                name: "Ada".to_string(),
            })
            .unwrap();
        store
            .put_staff(&Staff {
                staff_id: StaffId::new(7),
                name: "Grace".to_string(),
            })
            .unwrap();
        (store, dir)
    }

    #[test]
    fn raiser_must_be_exactly_one() {
        assert_eq!(
            resolve_raiser(Some(UserId::new(1)), None).unwrap(),
            Raiser::User(UserId::new(1))
        );
        assert_eq!(
            resolve_raiser(None, Some(StaffId::new(2))).unwrap(),
            Raiser::Staff(StaffId::new(2))
        );

        let both = resolve_raiser(Some(UserId::new(1)), Some(StaffId::new(2))).unwrap_err();
        assert_eq!(
            both.to_string(),
            "Ticket can be raised by either a user or staff, not both"
        );
        let neither = resolve_raiser(None, None).unwrap_err();
        assert_eq!(
            neither.to_string(),
            "Ticket must be raised by either a user or staff"
        );
    }

    #[test]
    fn every_transition_is_allowed() {
        for from in TicketStatus::ALL {
            for to in TicketStatus::ALL {
                assert!(is_valid_transition(from, to));
            }
            assert_eq!(status_after_assignment(from), TicketStatus::InProgress);
        }
    }

    #[test]
    fn create_defaults() {
        let (store, _dir) = setup();
        let request = CreateTicketRequest::raised_by_user("hardware", "laptop broken", UserId::new(42));

        let (ticket, raised_by) = create_ticket(&store, request).unwrap();
        assert_eq!(ticket.ticket_id, TicketId::new(1));
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.priority, TicketPriority::Medium);
        assert_eq!(ticket.created_at, ticket.updated_at);
        assert_eq!(raised_by.raiser, Raiser::User(UserId::new(42)));
        assert_eq!(raised_by.version, 1);
    }

    #[test]
    fn create_with_unknown_raiser_writes_nothing() {
        let (store, _dir) = setup();

        let request = CreateTicketRequest::raised_by_user("hardware", "x", UserId::new(99));
        assert!(matches!(
            create_ticket(&store, request),
            Err(DeskError::UserNotFound(_))
        ));

        let request = CreateTicketRequest::raised_by_staff("hardware", "x", StaffId::new(99));
        assert!(matches!(
            create_ticket(&store, request),
            Err(DeskError::StaffNotFound(_))
        ));

        assert!(store.list_all_tickets().unwrap().is_empty());
    }

    #[test]
    fn assignment_bumps_version_and_refreshes_updated_at() {
        let (store, _dir) = setup();
        let request = CreateTicketRequest::raised_by_user("hardware", "x", UserId::new(42));
        let (created, _) = create_ticket(&store, request).unwrap();

        let (ticket, first) = assign_ticket(&store, created.ticket_id, StaffId::new(7)).unwrap();
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert!(ticket.updated_at >= created.updated_at);
        assert_eq!(ticket.created_at, created.created_at);
        assert_eq!(first.version, 1);

        let (_, second) = assign_ticket(&store, created.ticket_id, StaffId::new(7)).unwrap();
        assert_eq!(second.version, 2);
    }

    #[test]
    fn update_status_reports_previous() {
        let (store, _dir) = setup();
        let request = CreateTicketRequest::raised_by_user("hardware", "x", UserId::new(42));
        let (created, _) = create_ticket(&store, request).unwrap();

        let (ticket, previous) =
            update_status(&store, created.ticket_id, TicketStatus::Closed).unwrap();
        assert_eq!(previous, TicketStatus::Open);
        assert_eq!(ticket.status, TicketStatus::Closed);

        let missing = update_status(&store, TicketId::new(404), TicketStatus::Open);
        assert!(matches!(missing, Err(DeskError::TicketNotFound(_))));
    }
}

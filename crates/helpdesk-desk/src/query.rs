//! Ticket listing and filtering.
//!
//! An absent filter means "no filter": the full ticket set is returned.

use helpdesk_core::{StaffId, TicketId, UserId};
use helpdesk_store::{RaisedBy, Raiser, Store, Ticket, TicketPriority, TicketStatus};

use crate::error::Result;
use crate::types::{AssignmentDetails, RaisedByDetails, TicketView};
use crate::view;

/// List every ticket in ascending id order.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_all<S: Store>(store: &S) -> Result<Vec<Ticket>> {
    Ok(store.list_all_tickets()?)
}

/// List views of one ticket, or of every ticket when `ticket_id` is `None`.
///
/// # Errors
///
/// Returns `DeskError::TicketNotFound` if a specific ticket was asked for and
/// does not exist.
pub fn list_views<S: Store>(store: &S, ticket_id: Option<TicketId>) -> Result<Vec<TicketView>> {
    if let Some(ticket_id) = ticket_id {
        return Ok(vec![view::ticket_details(store, ticket_id)?]);
    }

    store
        .list_all_tickets()?
        .into_iter()
        .map(|ticket| view::assemble(store, ticket))
        .collect()
}

/// Tickets with the given status, or all tickets.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn filter_by_status<S: Store>(store: &S, status: Option<TicketStatus>) -> Result<Vec<Ticket>> {
    match status {
        Some(status) => Ok(store.list_tickets_by_status(status)?),
        None => list_all(store),
    }
}

/// Tickets with the given priority, or all tickets.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn filter_by_priority<S: Store>(
    store: &S,
    priority: Option<TicketPriority>,
) -> Result<Vec<Ticket>> {
    match priority {
        Some(priority) => Ok(store.list_tickets_by_priority(priority)?),
        None => list_all(store),
    }
}

/// Raised-by records of tickets raised by a user, with ticket and user attached.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn raised_by_user<S: Store>(store: &S, user_id: UserId) -> Result<Vec<RaisedByDetails>> {
    expand_raised_by(store, store.list_raised_by_user(user_id)?)
}

/// Raised-by records of tickets raised by a staff member, with ticket and staff attached.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn raised_by_staff<S: Store>(store: &S, staff_id: StaffId) -> Result<Vec<RaisedByDetails>> {
    expand_raised_by(store, store.list_raised_by_staff(staff_id)?)
}

/// Assignments currently held by a staff member, with ticket and staff attached.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn assigned_to_staff<S: Store>(
    store: &S,
    staff_id: StaffId,
) -> Result<Vec<AssignmentDetails>> {
    let records = store.list_assignments_by_staff(staff_id)?;
    let staff = store.get_staff(staff_id)?;

    let mut details = Vec::with_capacity(records.len());
    for record in records {
        let Some(ticket) = store.get_ticket(record.ticket_id)? else {
            tracing::warn!(ticket_id = %record.ticket_id, "Assignment without ticket");
            continue;
        };
        details.push(AssignmentDetails {
            record,
            ticket,
            staff: staff.clone(),
        });
    }
    Ok(details)
}

fn expand_raised_by<S: Store>(store: &S, records: Vec<RaisedBy>) -> Result<Vec<RaisedByDetails>> {
    let mut details = Vec::with_capacity(records.len());
    for record in records {
        let Some(ticket) = store.get_ticket(record.ticket_id)? else {
            tracing::warn!(ticket_id = %record.ticket_id, "Raised-by record without ticket");
            continue;
        };
        let (user, staff) = match record.raiser {
            Raiser::User(user_id) => (store.get_user(user_id)?, None),
            Raiser::Staff(staff_id) => (None, store.get_staff(staff_id)?),
        };
        details.push(RaisedByDetails {
            record,
            ticket,
            user,
            staff,
        });
    }
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskError;
    use crate::lifecycle;
    use crate::types::CreateTicketRequest;
    use helpdesk_store::{RocksStore, Staff, User};
    use tempfile::TempDir;

    fn seeded() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        store
            .put_user(&User {
                user_id: UserId::new(1),
                name: "Ada".to_string(),
            })
            .unwrap();

        for priority in [TicketPriority::Low, TicketPriority::High, TicketPriority::High] {
            let request = CreateTicketRequest::raised_by_user("software", "bug", UserId::new(1))
                .with_priority(priority);
            lifecycle::create_ticket(&store, request).unwrap();
        }
        lifecycle::update_status(&store, TicketId::new(2), TicketStatus::Resolved).unwrap();

        (store, dir)
    }

    #[test]
    fn absent_filters_return_everything() {
        let (store, _dir) = seeded();
        let all = list_all(&store).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(filter_by_status(&store, None).unwrap(), all);
        assert_eq!(filter_by_priority(&store, None).unwrap(), all);
    }

    #[test]
    fn exact_match_filters() {
        let (store, _dir) = seeded();

        let high = filter_by_priority(&store, Some(TicketPriority::High)).unwrap();
        assert_eq!(high.len(), 2);
        assert!(filter_by_priority(&store, Some(TicketPriority::Medium))
            .unwrap()
            .is_empty());

        let open = filter_by_status(&store, Some(TicketStatus::Open)).unwrap();
        let ids: Vec<u64> = open.iter().map(|t| t.ticket_id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn views_single_and_all() {
        let (store, _dir) = seeded();

        let one = list_views(&store, Some(TicketId::new(2))).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].ticket.status, TicketStatus::Resolved);

        assert_eq!(list_views(&store, None).unwrap().len(), 3);

        let missing = list_views(&store, Some(TicketId::new(9)));
        assert!(matches!(missing, Err(DeskError::TicketNotFound(_))));
    }

    #[test]
    fn assignments_carry_ticket_and_staff() {
        let (store, _dir) = seeded();
        store
            .put_staff(&Staff {
                staff_id: StaffId::new(7),
                name: "Grace".to_string(),
            })
            .unwrap();
        lifecycle::assign_ticket(&store, TicketId::new(3), StaffId::new(7)).unwrap();

        let assigned = assigned_to_staff(&store, StaffId::new(7)).unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].record.ticket_id, TicketId::new(3));
        assert_eq!(assigned[0].ticket.ticket_type, "software");
        assert_eq!(assigned[0].ticket.status, TicketStatus::InProgress);
        assert_eq!(assigned[0].staff.as_ref().unwrap().name, "Grace");
    }

    #[test]
    fn association_lookups_are_empty_not_errors() {
        let (store, _dir) = seeded();
        let raised = raised_by_user(&store, UserId::new(1)).unwrap();
        assert_eq!(raised.len(), 3);
        assert_eq!(raised[1].ticket.status, TicketStatus::Resolved);
        assert_eq!(raised[0].user.as_ref().unwrap().name, "Ada");
        assert!(raised[0].staff.is_none());
        assert!(raised_by_user(&store, UserId::new(2)).unwrap().is_empty());
        assert!(raised_by_staff(&store, StaffId::new(1)).unwrap().is_empty());
        assert!(assigned_to_staff(&store, StaffId::new(1)).unwrap().is_empty());
    }
}

//! Ticket view assembly.
//!
//! Joins a ticket with the display fields of its raiser and assignee. Missing
//! association records, or associations pointing at directory entries that no
//! longer resolve, leave the corresponding part of the view empty.

use helpdesk_core::TicketId;
use helpdesk_store::{Raiser, RaiserKind, Store, Ticket};

use crate::error::{DeskError, Result};
use crate::types::{AssigneeView, RaiserView, TicketView};

/// Build the view of a single ticket.
///
/// # Errors
///
/// Returns `DeskError::TicketNotFound` if the ticket does not exist.
pub fn ticket_details<S: Store>(store: &S, ticket_id: TicketId) -> Result<TicketView> {
    let ticket = store
        .get_ticket(ticket_id)?
        .ok_or(DeskError::TicketNotFound(ticket_id))?;

    assemble(store, ticket)
}

/// Build the view of an already loaded ticket.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn assemble<S: Store>(store: &S, ticket: Ticket) -> Result<TicketView> {
    let raised_by = match store.get_raised_by(ticket.ticket_id)? {
        Some(record) => raiser_view(store, record.raiser)?,
        None => None,
    };

    let assigned_to = match store.get_assignment(ticket.ticket_id)? {
        Some(assignment) => store
            .get_staff(assignment.staff_id)?
            .map(|staff| AssigneeView {
                staff_id: staff.staff_id,
                name: staff.name,
            }),
        None => None,
    };

    if raised_by.is_none() {
        tracing::debug!(ticket_id = %ticket.ticket_id, "Ticket view has no raiser");
    }

    Ok(TicketView {
        ticket,
        raised_by,
        assigned_to,
    })
}

fn raiser_view<S: Store>(store: &S, raiser: Raiser) -> Result<Option<RaiserView>> {
    let view = match raiser {
        Raiser::User(user_id) => store.get_user(user_id)?.map(|user| RaiserView {
            kind: RaiserKind::User,
            id: user.user_id.get(),
            name: user.name,
        }),
        Raiser::Staff(staff_id) => store.get_staff(staff_id)?.map(|staff| RaiserView {
            kind: RaiserKind::Staff,
            id: staff.staff_id.get(),
            name: staff.name,
        }),
    };
    Ok(view)
}

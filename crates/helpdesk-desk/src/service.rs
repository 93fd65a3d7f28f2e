//! Ticket desk service implementation.
//!
//! This module provides the `TicketDesk` trait and the `TicketDeskService`
//! implementation that ties the lifecycle, view, query, and directory
//! modules to a store.

use std::sync::Arc;

use async_trait::async_trait;
use helpdesk_core::{StaffId, TicketId, UserId};
use helpdesk_store::{Staff, Store, Ticket, TicketPriority, TicketStatus, User};

use crate::directory;
use crate::error::Result;
use crate::lifecycle;
use crate::query;
use crate::types::{AssignmentDetails, CreateTicketRequest, RaisedByDetails, TicketView};
use crate::view;

/// Trait defining the ticket desk operations.
///
/// This trait provides the complete API behind the HTTP surface.
#[async_trait]
pub trait TicketDesk: Send + Sync {
    // =========================================================================
    // Lifecycle Operations
    // =========================================================================

    /// Raise a new ticket.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::InvalidRequest` unless exactly one raiser is given,
    /// or a not-found error if the raiser does not exist.
    async fn create_ticket(&self, request: CreateTicketRequest) -> Result<Ticket>;

    /// Assign a ticket to a staff member. Forces the ticket to `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ticket or staff member, or
    /// `DeskError::Conflict` if a concurrent assignment won.
    async fn assign_ticket(&self, ticket_id: TicketId, staff_id: StaffId) -> Result<Ticket>;

    /// Set a ticket's status. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::TicketNotFound` for an unknown ticket.
    async fn update_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket>;

    // =========================================================================
    // Views and Queries
    // =========================================================================

    /// Get the composed view of a ticket.
    ///
    /// # Errors
    ///
    /// Returns `DeskError::TicketNotFound` for an unknown ticket.
    async fn ticket_details(&self, ticket_id: TicketId) -> Result<TicketView>;

    /// List every ticket.
    async fn list_tickets(&self) -> Result<Vec<Ticket>>;

    /// List views of one ticket, or of all tickets.
    async fn list_ticket_views(&self, ticket_id: Option<TicketId>) -> Result<Vec<TicketView>>;

    /// Raised-by records for tickets raised by a user.
    async fn list_raised_by_user(&self, user_id: UserId) -> Result<Vec<RaisedByDetails>>;

    /// Raised-by records for tickets raised by a staff member.
    async fn list_raised_by_staff(&self, staff_id: StaffId) -> Result<Vec<RaisedByDetails>>;

    /// Assignments currently held by a staff member.
    async fn list_assigned_to_staff(&self, staff_id: StaffId) -> Result<Vec<AssignmentDetails>>;

    /// Tickets with a status, or all tickets when `None`.
    async fn filter_by_status(&self, status: Option<TicketStatus>) -> Result<Vec<Ticket>>;

    /// Tickets with a priority, or all tickets when `None`.
    async fn filter_by_priority(&self, priority: Option<TicketPriority>) -> Result<Vec<Ticket>>;

    // =========================================================================
    // Directory
    // =========================================================================

    /// Register a user.
    async fn register_user(&self, name: &str) -> Result<User>;

    /// Look up a user.
    async fn get_user(&self, user_id: UserId) -> Result<User>;

    /// Register a staff member.
    async fn register_staff(&self, name: &str) -> Result<Staff>;

    /// Look up a staff member.
    async fn get_staff(&self, staff_id: StaffId) -> Result<Staff>;
}

/// The main ticket desk service implementation.
pub struct TicketDeskService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> TicketDeskService<S> {
    /// Create a new ticket desk service.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: Store + 'static> TicketDesk for TicketDeskService<S> {
    // =========================================================================
    // Lifecycle Operations
    // =========================================================================

    async fn create_ticket(&self, request: CreateTicketRequest) -> Result<Ticket> {
        let (ticket, raised_by) = lifecycle::create_ticket(&*self.store, request)?;

        tracing::info!(
            ticket_id = %ticket.ticket_id,
            raiser = ?raised_by.raiser,
            priority = %ticket.priority,
            "Created ticket"
        );

        Ok(ticket)
    }

    async fn assign_ticket(&self, ticket_id: TicketId, staff_id: StaffId) -> Result<Ticket> {
        let (ticket, assignment) = lifecycle::assign_ticket(&*self.store, ticket_id, staff_id)?;

        tracing::info!(
            ticket_id = %ticket_id,
            staff_id = %staff_id,
            version = assignment.version,
            "Assigned ticket"
        );

        Ok(ticket)
    }

    async fn update_ticket_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<Ticket> {
        let (ticket, previous) = lifecycle::update_status(&*self.store, ticket_id, status)?;

        tracing::info!(
            ticket_id = %ticket_id,
            from = %previous,
            to = %status,
            "Updated ticket status"
        );

        Ok(ticket)
    }

    // =========================================================================
    // Views and Queries
    // =========================================================================

    async fn ticket_details(&self, ticket_id: TicketId) -> Result<TicketView> {
        view::ticket_details(&*self.store, ticket_id)
    }

    async fn list_tickets(&self) -> Result<Vec<Ticket>> {
        query::list_all(&*self.store)
    }

    async fn list_ticket_views(&self, ticket_id: Option<TicketId>) -> Result<Vec<TicketView>> {
        let views = query::list_views(&*self.store, ticket_id)?;
        tracing::debug!(ticket_id = ?ticket_id, count = views.len(), "Listed ticket views");
        Ok(views)
    }

    async fn list_raised_by_user(&self, user_id: UserId) -> Result<Vec<RaisedByDetails>> {
        query::raised_by_user(&*self.store, user_id)
    }

    async fn list_raised_by_staff(&self, staff_id: StaffId) -> Result<Vec<RaisedByDetails>> {
        query::raised_by_staff(&*self.store, staff_id)
    }

    async fn list_assigned_to_staff(&self, staff_id: StaffId) -> Result<Vec<AssignmentDetails>> {
        query::assigned_to_staff(&*self.store, staff_id)
    }

    async fn filter_by_status(&self, status: Option<TicketStatus>) -> Result<Vec<Ticket>> {
        query::filter_by_status(&*self.store, status)
    }

    async fn filter_by_priority(&self, priority: Option<TicketPriority>) -> Result<Vec<Ticket>> {
        query::filter_by_priority(&*self.store, priority)
    }

    // =========================================================================
    // Directory
    // =========================================================================

    async fn register_user(&self, name: &str) -> Result<User> {
        let user = directory::register_user(&*self.store, name)?;
        tracing::info!(user_id = %user.user_id, "Registered user");
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> Result<User> {
        directory::get_user(&*self.store, user_id)
    }

    async fn register_staff(&self, name: &str) -> Result<Staff> {
        let staff = directory::register_staff(&*self.store, name)?;
        tracing::info!(staff_id = %staff.staff_id, "Registered staff");
        Ok(staff)
    }

    async fn get_staff(&self, staff_id: StaffId) -> Result<Staff> {
        directory::get_staff(&*self.store, staff_id)
    }
}

//! Ticket endpoints.
//!
//! This module provides handlers for raising, assigning, and updating tickets,
//! plus the read-side listings and filters.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use helpdesk_desk::{
    AssignmentDetails, CreateTicketRequest, RaisedByDetails, Raiser, RaiserKind, StaffId, Ticket,
    TicketDesk, TicketId, TicketPriority, TicketStatus, TicketView, UserId,
};

use crate::error::ApiError;
use crate::handlers::directory::PersonResponse;
use crate::state::GatewayState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to raise a ticket.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketBody {
    /// Free-form category.
    #[serde(default, rename = "type")]
    pub ticket_type: Option<String>,
    /// Description of the problem.
    #[serde(default)]
    pub description: Option<String>,
    /// Priority, `MEDIUM` when omitted.
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    /// Raising user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Raising staff member.
    #[serde(default)]
    pub staff_id: Option<StaffId>,
}

/// Request to assign a ticket.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTicketBody {
    /// Staff member taking the ticket.
    #[serde(default)]
    pub staff_id: Option<StaffId>,
}

/// Request to change a ticket's status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    /// New status.
    #[serde(default)]
    pub status: Option<TicketStatus>,
}

/// Query for `/api/tickets/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Restrict the search to one ticket.
    #[serde(default)]
    pub ticket_id: Option<String>,
}

/// Query for `/api/tickets/filter-by-status`.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    /// Status to match.
    #[serde(default)]
    pub status: Option<String>,
}

/// Query for `/api/tickets/filter-by-priority`.
#[derive(Debug, Default, Deserialize)]
pub struct PriorityQuery {
    /// Priority to match.
    #[serde(default)]
    pub priority: Option<String>,
}

/// A ticket as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    /// Ticket id.
    pub id: TicketId,
    /// Free-form category.
    #[serde(rename = "type")]
    pub ticket_type: String,
    /// Description of the problem.
    pub description: String,
    /// Current status.
    pub status: TicketStatus,
    /// Priority.
    pub priority: TicketPriority,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.ticket_id,
            ticket_type: ticket.ticket_type,
            description: ticket.description,
            status: ticket.status,
            priority: ticket.priority,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

/// A ticket with its raiser and assignee flattened in.
///
/// Raiser and assignee fields are `null` when the association is missing or
/// does not resolve.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketViewResponse {
    /// The ticket fields.
    #[serde(flatten)]
    pub ticket: TicketResponse,
    /// Id of the raising user or staff member.
    pub raised_by_id: Option<u64>,
    /// Name of the raiser.
    pub raised_by_name: Option<String>,
    /// `USER` or `STAFF`.
    pub raised_by_type: Option<RaiserKind>,
    /// Assigned staff member.
    pub assigned_to_id: Option<StaffId>,
    /// Name of the assigned staff member.
    pub assigned_to_name: Option<String>,
}

impl From<TicketView> for TicketViewResponse {
    fn from(view: TicketView) -> Self {
        let (raised_by_id, raised_by_name, raised_by_type) = match view.raised_by {
            Some(raiser) => (Some(raiser.id), Some(raiser.name), Some(raiser.kind)),
            None => (None, None, None),
        };
        let (assigned_to_id, assigned_to_name) = match view.assigned_to {
            Some(assignee) => (Some(assignee.staff_id), Some(assignee.name)),
            None => (None, None),
        };

        Self {
            ticket: TicketResponse::from(view.ticket),
            raised_by_id,
            raised_by_name,
            raised_by_type,
            assigned_to_id,
            assigned_to_name,
        }
    }
}

/// A raised-by association as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaisedByResponse {
    /// The ticket id.
    pub ticket_id: TicketId,
    /// The ticket itself.
    pub ticket: TicketResponse,
    /// `USER` or `STAFF`.
    pub raised_by_type: RaiserKind,
    /// Raising user id, when raised by a user.
    pub user_id: Option<UserId>,
    /// Raising user, when raised by a user that still resolves.
    pub user: Option<PersonResponse>,
    /// Raising staff id, when raised by staff.
    pub staff_id: Option<StaffId>,
    /// Raising staff member, when raised by staff that still resolves.
    pub staff: Option<PersonResponse>,
    /// Record version.
    pub version: u64,
}

impl From<RaisedByDetails> for RaisedByResponse {
    fn from(details: RaisedByDetails) -> Self {
        let record = details.record;
        let (user_id, staff_id) = match record.raiser {
            Raiser::User(user_id) => (Some(user_id), None),
            Raiser::Staff(staff_id) => (None, Some(staff_id)),
        };
        Self {
            ticket_id: record.ticket_id,
            ticket: TicketResponse::from(details.ticket),
            raised_by_type: record.raiser.kind(),
            user_id,
            user: details.user.map(PersonResponse::from),
            staff_id,
            staff: details.staff.map(PersonResponse::from),
            version: record.version,
        }
    }
}

/// An assignment as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedToResponse {
    /// The ticket id.
    pub ticket_id: TicketId,
    /// The ticket itself.
    pub ticket: TicketResponse,
    /// Assigned staff id.
    pub staff_id: StaffId,
    /// Assigned staff member, when the staff record resolves.
    pub staff: Option<PersonResponse>,
    /// Bumped on every re-assignment.
    pub version: u64,
}

impl From<AssignmentDetails> for AssignedToResponse {
    fn from(details: AssignmentDetails) -> Self {
        Self {
            ticket_id: details.record.ticket_id,
            ticket: TicketResponse::from(details.ticket),
            staff_id: details.record.staff_id,
            staff: details.staff.map(PersonResponse::from),
            version: details.record.version,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Raise a ticket.
///
/// # Errors
///
/// Returns an error if:
/// - type or description is missing or blank
/// - both or neither of `userId` / `staffId` are given
/// - the raiser does not exist
pub async fn create_ticket<D>(
    State(state): State<Arc<GatewayState<D>>>,
    payload: Result<Json<CreateTicketBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let Json(body) = payload?;

    let (Some(ticket_type), Some(description)) = (
        non_blank(body.ticket_type),
        non_blank(body.description),
    ) else {
        return Err(ApiError::bad_request("Type and description are required"));
    };

    let request = CreateTicketRequest {
        ticket_type,
        description,
        priority: body.priority,
        user_id: body.user_id,
        staff_id: body.staff_id,
    };
    let ticket = state.desk.create_ticket(request).await?;

    Ok(Json(TicketResponse::from(ticket)))
}

/// Assign a ticket to a staff member.
///
/// # Errors
///
/// Returns an error if `staffId` is missing, or the ticket or staff member
/// does not exist.
pub async fn assign_ticket<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Path(ticket_id): Path<String>,
    payload: Result<Json<AssignTicketBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let ticket_id: TicketId = parse_id(&ticket_id, "ticket")?;
    let Json(body) = payload?;
    let staff_id = body
        .staff_id
        .ok_or_else(|| ApiError::bad_request("Staff ID is required for assignment"))?;

    let ticket = state.desk.assign_ticket(ticket_id, staff_id).await?;

    Ok(Json(TicketResponse::from(ticket)))
}

/// Change a ticket's status.
///
/// # Errors
///
/// Returns an error if `status` is missing or unknown, or the ticket does not
/// exist.
pub async fn update_status<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Path(ticket_id): Path<String>,
    payload: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let ticket_id: TicketId = parse_id(&ticket_id, "ticket")?;
    let Json(body) = payload?;
    let status = body
        .status
        .ok_or_else(|| ApiError::bad_request("Status is required"))?;

    let ticket = state.desk.update_ticket_status(ticket_id, status).await?;

    Ok(Json(TicketResponse::from(ticket)))
}

/// List every ticket.
///
/// # Errors
///
/// Returns an error if the desk operation fails.
pub async fn list_tickets<D>(
    State(state): State<Arc<GatewayState<D>>>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let tickets = state.desk.list_tickets().await?;
    Ok(Json(tickets_response(tickets)))
}

/// Get the composed view of one ticket.
///
/// # Errors
///
/// Returns an error if the ticket does not exist.
pub async fn get_ticket<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let ticket_id: TicketId = parse_id(&ticket_id, "ticket")?;
    let view = state.desk.ticket_details(ticket_id).await?;

    Ok(Json(TicketViewResponse::from(view)))
}

/// Views of one ticket, or of every ticket when `ticketId` is absent.
///
/// # Errors
///
/// Returns an error if `ticketId` is malformed or names a missing ticket.
pub async fn search_tickets<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let ticket_id: Option<TicketId> = parse_optional(query.ticket_id, "ticket id")?;
    let views = state.desk.list_ticket_views(ticket_id).await?;

    Ok(Json(
        views
            .into_iter()
            .map(TicketViewResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Tickets raised by a user.
///
/// # Errors
///
/// Returns an error if the id is malformed.
pub async fn raised_by_user<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let user_id: UserId = parse_id(&user_id, "user")?;
    let records = state.desk.list_raised_by_user(user_id).await?;

    Ok(Json(raised_by_response(records)))
}

/// Tickets raised by a staff member.
///
/// # Errors
///
/// Returns an error if the id is malformed.
pub async fn raised_by_staff<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Path(staff_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let staff_id: StaffId = parse_id(&staff_id, "staff")?;
    let records = state.desk.list_raised_by_staff(staff_id).await?;

    Ok(Json(raised_by_response(records)))
}

/// Tickets currently assigned to a staff member.
///
/// # Errors
///
/// Returns an error if the id is malformed.
pub async fn assigned_to_staff<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Path(staff_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let staff_id: StaffId = parse_id(&staff_id, "staff")?;
    let records = state.desk.list_assigned_to_staff(staff_id).await?;

    Ok(Json(
        records
            .into_iter()
            .map(AssignedToResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Tickets with a status, or every ticket when `status` is absent.
///
/// # Errors
///
/// Returns an error if `status` is not a known status name.
pub async fn filter_by_status<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let status: Option<TicketStatus> = parse_optional(query.status, "status")?;
    let tickets = state.desk.filter_by_status(status).await?;

    Ok(Json(tickets_response(tickets)))
}

/// Tickets with a priority, or every ticket when `priority` is absent.
///
/// # Errors
///
/// Returns an error if `priority` is not a known priority name.
pub async fn filter_by_priority<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Query(query): Query<PriorityQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let priority: Option<TicketPriority> = parse_optional(query.priority, "priority")?;
    let tickets = state.desk.filter_by_priority(priority).await?;

    Ok(Json(tickets_response(tickets)))
}

// =============================================================================
// Helpers
// =============================================================================

fn tickets_response(tickets: Vec<Ticket>) -> Vec<TicketResponse> {
    tickets.into_iter().map(TicketResponse::from).collect()
}

fn raised_by_response(records: Vec<RaisedByDetails>) -> Vec<RaisedByResponse> {
    records.into_iter().map(RaisedByResponse::from).collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a path id.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid {what} id: {raw}")))
}

/// Parse an optional query value. Missing and empty values are both `None`.
fn parse_optional<T: FromStr>(raw: Option<String>, what: &str) -> Result<Option<T>, ApiError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("invalid {what}: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_desk::{AssigneeView, RaisedBy, RaiserView, Staff};

    #[test]
    fn optional_query_values() {
        let absent: Option<TicketStatus> = parse_optional(None, "status").unwrap();
        assert!(absent.is_none());

        let empty: Option<TicketStatus> = parse_optional(Some(String::new()), "status").unwrap();
        assert!(empty.is_none());

        let status: Option<TicketStatus> =
            parse_optional(Some("IN_PROGRESS".into()), "status").unwrap();
        assert_eq!(status, Some(TicketStatus::InProgress));

        let bad = parse_optional::<TicketPriority>(Some("URGENT".into()), "priority").unwrap_err();
        assert_eq!(bad.to_string(), "invalid priority: URGENT");
    }

    #[test]
    fn path_ids() {
        let id: TicketId = parse_id("12", "ticket").unwrap();
        assert_eq!(id, TicketId::new(12));

        let err = parse_id::<StaffId>("abc", "staff").unwrap_err();
        assert_eq!(err.to_string(), "invalid staff id: abc");
    }

    #[test]
    fn view_response_flattens_associations() {
        let now = Utc::now();
        let view = TicketView {
            ticket: Ticket {
                ticket_id: TicketId::new(1),
                ticket_type: "hardware".into(),
                description: "laptop broken".into(),
                status: TicketStatus::Closed,
                priority: TicketPriority::Medium,
                created_at: now,
                updated_at: now,
            },
            raised_by: Some(RaiserView {
                kind: RaiserKind::User,
                id: 42,
                name: "Ada".into(),
            }),
            assigned_to: Some(AssigneeView {
                staff_id: StaffId::new(7),
                name: "Grace".into(),
            }),
        };

        let json = serde_json::to_value(TicketViewResponse::from(view)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["type"], "hardware");
        assert_eq!(json["status"], "CLOSED");
        assert_eq!(json["raisedByType"], "USER");
        assert_eq!(json["raisedById"], 42);
        assert_eq!(json["assignedToId"], 7);
        assert_eq!(json["assignedToName"], "Grace");
    }

    #[test]
    fn raised_by_response_embeds_ticket_and_raiser() {
        let now = Utc::now();
        let details = RaisedByDetails {
            record: RaisedBy {
                ticket_id: TicketId::new(4),
                raiser: Raiser::Staff(StaffId::new(2)),
                version: 1,
            },
            ticket: Ticket {
                ticket_id: TicketId::new(4),
                ticket_type: "network".into(),
                description: "vpn down".into(),
                status: TicketStatus::Open,
                priority: TicketPriority::High,
                created_at: now,
                updated_at: now,
            },
            user: None,
            staff: Some(Staff {
                staff_id: StaffId::new(2),
                name: "Grace".into(),
            }),
        };
        let json = serde_json::to_value(RaisedByResponse::from(details)).unwrap();
        assert_eq!(json["ticketId"], 4);
        assert_eq!(json["ticket"]["type"], "network");
        assert_eq!(json["ticket"]["priority"], "HIGH");
        assert_eq!(json["raisedByType"], "STAFF");
        assert_eq!(json["staffId"], 2);
        assert_eq!(json["staff"]["name"], "Grace");
        assert!(json["userId"].is_null());
        assert!(json["user"].is_null());
    }
}

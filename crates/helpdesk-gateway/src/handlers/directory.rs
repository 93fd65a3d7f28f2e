//! User and staff directory endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use helpdesk_desk::{Staff, StaffId, TicketDesk, User, UserId};

use crate::error::ApiError;
use crate::handlers::tickets::parse_id;
use crate::state::GatewayState;

/// Request to register a user or staff member.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// A user or staff member as returned by the API.
#[derive(Debug, Serialize)]
pub struct PersonResponse {
    /// User or staff id.
    pub id: u64,
    /// Display name.
    pub name: String,
}

impl From<User> for PersonResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id.get(),
            name: user.name,
        }
    }
}

impl From<Staff> for PersonResponse {
    fn from(staff: Staff) -> Self {
        Self {
            id: staff.staff_id.get(),
            name: staff.name,
        }
    }
}

/// Register a user.
///
/// # Errors
///
/// Returns an error if the name is blank.
pub async fn register_user<D>(
    State(state): State<Arc<GatewayState<D>>>,
    payload: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let Json(body) = payload?;
    let user = state.desk.register_user(&body.name).await?;

    Ok(Json(PersonResponse::from(user)))
}

/// Look up a user.
///
/// # Errors
///
/// Returns an error if the id is malformed or unknown.
pub async fn get_user<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let user_id: UserId = parse_id(&user_id, "user")?;
    let user = state.desk.get_user(user_id).await?;

    Ok(Json(PersonResponse::from(user)))
}

/// Register a staff member.
///
/// # Errors
///
/// Returns an error if the name is blank.
pub async fn register_staff<D>(
    State(state): State<Arc<GatewayState<D>>>,
    payload: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let Json(body) = payload?;
    let staff = state.desk.register_staff(&body.name).await?;

    Ok(Json(PersonResponse::from(staff)))
}

/// Look up a staff member.
///
/// # Errors
///
/// Returns an error if the id is malformed or unknown.
pub async fn get_staff<D>(
    State(state): State<Arc<GatewayState<D>>>,
    Path(staff_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    D: TicketDesk + 'static,
{
    let staff_id: StaffId = parse_id(&staff_id, "staff")?;
    let staff = state.desk.get_staff(staff_id).await?;

    Ok(Json(PersonResponse::from(staff)))
}

//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use helpdesk_desk::TicketDesk;

use crate::config::GatewayConfig;
use crate::handlers::{directory, health, tickets};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
///
/// ## Tickets
/// - `POST /api/tickets` - Raise a ticket
/// - `GET /api/tickets` - List tickets
/// - `GET /api/tickets/:ticket_id` - Ticket view
/// - `PUT /api/tickets/:ticket_id/assign` - Assign to staff
/// - `PUT /api/tickets/:ticket_id/status` - Change status
/// - `GET /api/tickets/search?ticketId=` - Ticket views
/// - `GET /api/tickets/raised-by/user/:user_id`
/// - `GET /api/tickets/raised-by/staff/:staff_id`
/// - `GET /api/tickets/assigned-to/staff/:staff_id`
/// - `GET /api/tickets/filter-by-status?status=`
/// - `GET /api/tickets/filter-by-priority?priority=`
///
/// ## Directory
/// - `POST /api/users`, `GET /api/users/:user_id`
/// - `POST /api/staff`, `GET /api/staff/:staff_id`
pub fn create_router<D>(state: GatewayState<D>) -> Router
where
    D: TicketDesk + 'static,
{
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config))
        .map_response(IntoResponse::into_response)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes))
        .layer(TimeoutLayer::new(state.config.request_timeout()));

    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health::health))
        // Tickets
        .route(
            "/api/tickets",
            get(tickets::list_tickets::<D>).post(tickets::create_ticket::<D>),
        )
        .route("/api/tickets/search", get(tickets::search_tickets::<D>))
        .route(
            "/api/tickets/filter-by-status",
            get(tickets::filter_by_status::<D>),
        )
        .route(
            "/api/tickets/filter-by-priority",
            get(tickets::filter_by_priority::<D>),
        )
        .route(
            "/api/tickets/raised-by/user/:user_id",
            get(tickets::raised_by_user::<D>),
        )
        .route(
            "/api/tickets/raised-by/staff/:staff_id",
            get(tickets::raised_by_staff::<D>),
        )
        .route(
            "/api/tickets/assigned-to/staff/:staff_id",
            get(tickets::assigned_to_staff::<D>),
        )
        .route("/api/tickets/:ticket_id", get(tickets::get_ticket::<D>))
        .route(
            "/api/tickets/:ticket_id/assign",
            put(tickets::assign_ticket::<D>),
        )
        .route(
            "/api/tickets/:ticket_id/status",
            put(tickets::update_status::<D>),
        )
        // Directory
        .route("/api/users", post(directory::register_user::<D>))
        .route("/api/users/:user_id", get(directory::get_user::<D>))
        .route("/api/staff", post(directory::register_staff::<D>))
        .route("/api/staff/:staff_id", get(directory::get_staff::<D>))
        .layer(middleware)
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(config: &GatewayConfig) -> CorsLayer {
    if config.allows_any_origin() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

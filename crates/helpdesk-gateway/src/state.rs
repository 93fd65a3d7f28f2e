//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use helpdesk_desk::TicketDesk;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
pub struct GatewayState<D>
where
    D: TicketDesk,
{
    /// The ticket desk behind every endpoint.
    pub desk: Arc<D>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<D> GatewayState<D>
where
    D: TicketDesk,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(desk: Arc<D>, config: GatewayConfig) -> Self {
        Self { desk, config }
    }
}

impl<D> Clone for GatewayState<D>
where
    D: TicketDesk,
{
    fn clone(&self) -> Self {
        Self {
            desk: Arc::clone(&self.desk),
            config: self.config.clone(),
        }
    }
}

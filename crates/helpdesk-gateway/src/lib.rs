//! HTTP gateway for the helpdesk ticket service.
//!
//! This crate exposes the ticket desk over a JSON REST API:
//!
//! - raising, assigning, and updating tickets
//! - ticket views, association listings, and status/priority filters
//! - a small user and staff directory
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Clients                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ HTTP/JSON
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      helpdesk-gateway                       │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │   Router    │ │  Handlers   │ │  ApiError envelope  │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                      ┌───────────────┐      ┌──────────┐
//!                      │  TicketDesk   │ ───▶ │  Store   │
//!                      └───────────────┘      │ (RocksDB)│
//!                                             └──────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use helpdesk_desk::TicketDeskService;
//! use helpdesk_gateway::{create_router, GatewayConfig, GatewayState};
//! use helpdesk_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::default();
//! let store = Arc::new(RocksStore::open(&config.data_dir)?);
//! let desk = Arc::new(TicketDeskService::new(store));
//!
//! let listen_addr = config.listen_addr.clone();
//! let app = create_router(GatewayState::new(desk, config));
//!
//! let listener = tokio::net::TcpListener::bind(listen_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;

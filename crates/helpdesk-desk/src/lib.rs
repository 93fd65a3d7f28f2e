//! Ticket desk for the helpdesk service.
//!
//! This crate provides the business logic for raising tickets, assigning them
//! to staff, moving them through their statuses, and building the read views
//! the API serves. It sits between the HTTP gateway and the storage layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Gateway (HTTP)                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TicketDeskService                       │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────┐ ┌────────┐ │
//! │  │  Lifecycle  │ │    Views    │ │   Queries   │ │  Dir.  │ │
//! │  └─────────────┘ └─────────────┘ └─────────────┘ └────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                       ┌──────────────┐
//!                       │    Store     │
//!                       │  (RocksDB)   │
//!                       └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use helpdesk_desk::{CreateTicketRequest, TicketDesk, TicketDeskService};
//! use helpdesk_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/tmp/helpdesk")?);
//! let desk = TicketDeskService::new(store);
//!
//! let user = desk.register_user("Ada").await?;
//! let request = CreateTicketRequest::raised_by_user("hardware", "laptop broken", user.user_id);
//! let ticket = desk.create_ticket(request).await?;
//!
//! println!("Raised ticket {}", ticket.ticket_id);
//! # Ok(())
//! # }
//! ```
//!
//! See the [`lifecycle`] module for the status rules.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod directory;
pub mod error;
pub mod lifecycle;
pub mod query;
pub mod service;
pub mod types;
pub mod view;

pub use error::{DeskError, Result};
pub use service::{TicketDesk, TicketDeskService};
pub use types::{
    AssigneeView, AssignmentDetails, CreateTicketRequest, RaisedByDetails, RaiserView, TicketView,
};

// Re-export commonly used types from dependencies for convenience
pub use helpdesk_core::{StaffId, TicketId, UserId};
pub use helpdesk_store::{
    AssignedTo, RaisedBy, Raiser, RaiserKind, Staff, Ticket, TicketPriority, TicketStatus, User,
};

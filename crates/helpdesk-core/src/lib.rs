//! Core types for the helpdesk ticket service.
//!
//! This crate provides the strongly-typed identifiers shared by every other
//! crate in the workspace.
//!
//! # Example
//!
//! ```
//! use helpdesk_core::{StaffId, TicketId};
//!
//! let ticket_id: TicketId = "17".parse().unwrap();
//! assert_eq!(ticket_id.get(), 17);
//!
//! let staff_id = StaffId::new(7);
//! assert_eq!(staff_id.to_string(), "7");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;

pub use ids::{IdError, StaffId, TicketId, UserId};

//! HTTP request handlers.
//!
//! This module contains all the endpoint handlers for the helpdesk API.

pub mod directory;
pub mod health;
pub mod tickets;

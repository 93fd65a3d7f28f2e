//! Key encoding utilities for `RocksDB`.
//!
//! Ids are encoded big-endian so that iterating a column family yields
//! records in ascending id order. Index keys are `prefix || ticket_id`,
//! which supports prefix scans for "all tickets with X".

use helpdesk_core::{StaffId, TicketId, UserId};

/// Width of an encoded id.
pub const ID_LEN: usize = 8;

/// Encode a ticket key (the id bytes). Also keys both association families.
#[must_use]
pub fn ticket_key(ticket_id: TicketId) -> Vec<u8> {
    ticket_id.to_be_bytes().to_vec()
}

/// Encode a user key.
#[must_use]
pub fn user_key(user_id: UserId) -> Vec<u8> {
    user_id.to_be_bytes().to_vec()
}

/// Encode a staff key.
#[must_use]
pub fn staff_key(staff_id: StaffId) -> Vec<u8> {
    staff_id.to_be_bytes().to_vec()
}

/// Encode a status prefix for scanning all tickets by status.
#[must_use]
pub fn status_prefix(status: u8) -> Vec<u8> {
    vec![status]
}

/// Encode a status-ticket index key: `status || ticket_id`.
#[must_use]
pub fn status_ticket_key(status: u8, ticket_id: TicketId) -> Vec<u8> {
    index_key(&status_prefix(status), ticket_id)
}

/// Encode a priority prefix for scanning all tickets by priority.
#[must_use]
pub fn priority_prefix(priority: u8) -> Vec<u8> {
    vec![priority]
}

/// Encode a priority-ticket index key: `priority || ticket_id`.
#[must_use]
pub fn priority_ticket_key(priority: u8, ticket_id: TicketId) -> Vec<u8> {
    index_key(&priority_prefix(priority), ticket_id)
}

/// Encode a user-ticket index key: `user_id || ticket_id`.
#[must_use]
pub fn user_ticket_key(user_id: UserId, ticket_id: TicketId) -> Vec<u8> {
    index_key(&user_key(user_id), ticket_id)
}

/// Encode a staff-ticket index key: `staff_id || ticket_id`.
#[must_use]
pub fn staff_ticket_key(staff_id: StaffId, ticket_id: TicketId) -> Vec<u8> {
    index_key(&staff_key(staff_id), ticket_id)
}

/// Extract the ticket id that trails an index key with a prefix of `prefix_len` bytes.
///
/// Returns `None` if the key is malformed.
#[must_use]
pub fn extract_ticket_id(key: &[u8], prefix_len: usize) -> Option<TicketId> {
    let bytes: [u8; ID_LEN] = key.get(prefix_len..prefix_len + ID_LEN)?.try_into().ok()?;
    Some(TicketId::from_be_bytes(bytes))
}

/// Encode a sequence counter value.
#[must_use]
pub fn sequence_value(value: u64) -> [u8; ID_LEN] {
    value.to_be_bytes()
}

/// Decode a sequence counter value. Returns `None` unless it is exactly 8 bytes.
#[must_use]
pub fn decode_sequence_value(bytes: &[u8]) -> Option<u64> {
    bytes.try_into().ok().map(u64::from_be_bytes)
}

fn index_key(prefix: &[u8], ticket_id: TicketId) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + ID_LEN);
    key.extend_from_slice(prefix);
    key.extend_from_slice(&ticket_id.to_be_bytes());
    key
}

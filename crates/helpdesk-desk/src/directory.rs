//! User and staff directory.
//!
//! Tickets only reference users and staff by id; this module registers and
//! looks up the display records behind those ids.

use helpdesk_core::{StaffId, UserId};
use helpdesk_store::{Sequence, Staff, Store, User};

use crate::error::{DeskError, Result};

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DeskError::invalid("Name is required"));
    }
    Ok(trimmed.to_string())
}

/// Register a new user.
///
/// # Errors
///
/// Returns `DeskError::InvalidRequest` if the name is blank.
pub fn register_user<S: Store>(store: &S, name: &str) -> Result<User> {
    let name = validate_name(name)?;
    let user = User {
        user_id: UserId::new(store.next_id(Sequence::Users)?),
        name,
    };
    store.put_user(&user)?;
    Ok(user)
}

/// Register a new staff member.
///
/// # Errors
///
/// Returns `DeskError::InvalidRequest` if the name is blank.
pub fn register_staff<S: Store>(store: &S, name: &str) -> Result<Staff> {
    let name = validate_name(name)?;
    let staff = Staff {
        staff_id: StaffId::new(store.next_id(Sequence::Staff)?),
        name,
    };
    store.put_staff(&staff)?;
    Ok(staff)
}

/// Look up a user.
///
/// # Errors
///
/// Returns `DeskError::UserNotFound` if no such user exists.
pub fn get_user<S: Store>(store: &S, user_id: UserId) -> Result<User> {
    store
        .get_user(user_id)?
        .ok_or(DeskError::UserNotFound(user_id))
}

/// Look up a staff member.
///
/// # Errors
///
/// Returns `DeskError::StaffNotFound` if no such staff member exists.
pub fn get_staff<S: Store>(store: &S, staff_id: StaffId) -> Result<Staff> {
    store
        .get_staff(staff_id)?
        .ok_or(DeskError::StaffNotFound(staff_id))
}

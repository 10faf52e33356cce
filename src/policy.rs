//! Ownership rule shared by every read/update/delete of an owned record.
//!
//! The order is fixed: malformed id (400), then missing record (404), then
//! foreign owner (401). Existence is not hidden from non-owners.

use tracing::warn;
use uuid::Uuid;

use crate::{auth::session::AuthUser, error::AppError};

/// A record whose access is restricted to a single user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

pub fn parse_id(raw: &str, kind: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {kind} Id")))
}

pub fn authorize<T: Owned>(found: Option<T>, user: &AuthUser, kind: &str) -> Result<T, AppError> {
    let record = found.ok_or_else(|| AppError::NotFound(format!("{kind} not found")))?;
    if record.owner_id() != user.0 {
        warn!(owner = %record.owner_id(), user_id = %user.0, kind, "ownership check failed");
        return Err(AppError::Unauthorized(format!(
            "You cannot access this {}",
            kind.to_lowercase()
        )));
    }
    Ok(record)
}

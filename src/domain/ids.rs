//! Path identifiers.

use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Parse a raw path segment into an entity id.
///
/// Malformed ids are a client error, distinct from a well-formed id that
/// matches nothing.
pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::bad_request(format!("Invalid {} id format", what)))
}

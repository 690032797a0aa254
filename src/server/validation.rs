use uuid::Uuid;

use crate::query::QueryError;
use crate::server::response::ApiError;
use crate::types::ValidationErrors;

pub const INVALID_LEAD_ID: &str = "Invalid lead id";
pub const LEAD_NOT_FOUND: &str = "No lead found with this id";

/// Lead ids are lowercase hyphenated UUIDs, exactly as they are issued. Anything
/// else (including other UUID spellings) is reported as not found, with a message
/// that tells it apart from a well-formed id with no record.
pub fn validate_lead_id(id: &str) -> Result<(), ApiError> {
    match Uuid::parse_str(id) {
        Ok(uuid) if uuid.hyphenated().to_string() == id => Ok(()),
        _ => Err(ApiError::not_found(INVALID_LEAD_ID)),
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

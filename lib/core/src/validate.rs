//! Field validation helpers shared by request-level services.
//!
//! The first failing rule's message becomes the 400 response body, so
//! messages are phrased the way clients already expect: `"<field> is
//! required"`.

use crate::error::ServiceError;

/// A required text field: must be present and non-empty.
pub fn required_text(field: &str, value: Option<String>) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(ServiceError::Validation(format!(
            "{} is not allowed to be empty",
            field
        ))),
        None => Err(ServiceError::Validation(format!("{} is required", field))),
    }
}

/// An optional text field: may be absent, but if present must be non-empty.
pub fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>, ServiceError> {
    match value {
        None => Ok(None),
        Some(v) if !v.trim().is_empty() => Ok(Some(v)),
        Some(_) => Err(ServiceError::Validation(format!(
            "{} is not allowed to be empty",
            field
        ))),
    }
}

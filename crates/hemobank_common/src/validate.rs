//! Form field validation
//!
//! Every check runs before any store access; a failed validation never
//! touches the database.

use thiserror::Error;

/// Rejected user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    #[error("contact number must be exactly 10 digits")]
    BadContact,

    #[error("identifier must contain only letters and digits")]
    BadId,

    #[error("unknown blood group: {0}")]
    UnknownBloodGroup(String),

    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    #[error("unknown designation: {0}")]
    UnknownDesignation(String),

    #[error("unknown inventory action: {0}")]
    UnknownAction(String),

    #[error("quantity must be between {min} and {max}")]
    QuantityOutOfRange { min: i64, max: i64 },

    #[error("salary must be non-negative")]
    NegativeSalary,

    #[error("{0} {1} already exists")]
    DuplicateId(&'static str, String),
}

/// A contact number is exactly 10 ASCII digits
pub fn contact(value: &str) -> Result<(), ValidationError> {
    if value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::BadContact)
    }
}

/// Identifiers (donor, hospital, order, supply, storage) are non-empty
/// ASCII alphanumerics, e.g. "DON100"
pub fn identifier(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::BadId)
    }
}

/// Unit quantities are bounded per form (orders and supply 1..=50,
/// manual adjustments 1..=100)
pub fn quantity(value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::QuantityOutOfRange { min, max })
    }
}

/// Required text fields must be non-empty after trimming
pub fn required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

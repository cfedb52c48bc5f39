use thiserror::Error;

/// Error type shared by every store service.
///
/// Capacity shortfalls (insufficient stock) are deliberately *not* errors:
/// they clamp to the obtainable quantity and surface an [`Event`] instead,
/// so callers only ever see `StoreError` for user-triggered validation
/// failures, missing records, and disallowed operations.
///
/// [`Event`]: crate::events::Event
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Machine-readable error code for host UIs.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "not_found",
            StoreError::Validation(_) => "validation_error",
            StoreError::InvalidInput(_) => "invalid_input",
            StoreError::InvalidOperation(_) => "invalid_operation",
            StoreError::Serialization(_) => "serialization_error",
        }
    }
}

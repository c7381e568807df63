use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};

/// Standard error payload returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Conflict")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A workflow transition was attempted from a state that does not permit it.
    /// The message always carries the current and the required state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Allocation could not cover the requested quantity. The message carries
    /// requested vs available so callers can surface both.
    #[error("Insufficient inventory: {0}")]
    InsufficientInventory(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// Transient failure of a peer service; callers may retry. The engine
    /// itself never retries.
    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl From<sea_orm::TransactionError<ServiceError>> for ServiceError {
    fn from(err: sea_orm::TransactionError<ServiceError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(e) => ServiceError::DatabaseError(e),
            sea_orm::TransactionError::Transaction(e) => e,
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    pub fn db_error(err: DbErr) -> Self {
        ServiceError::DatabaseError(err)
    }

    /// Builds the canonical invalid-transition error, naming the record,
    /// where it is, and where it would have to be.
    pub fn invalid_state(entity: &str, current: &str, required: &str) -> Self {
        ServiceError::InvalidState(format!(
            "{} is {}, transition requires {}",
            entity, current, required
        ))
    }

    pub fn insufficient_inventory(requested: Decimal, available: Decimal) -> Self {
        ServiceError::InsufficientInventory(format!(
            "requested {}, available {}",
            requested, available
        ))
    }

    /// Single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::EventError(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidState(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InsufficientInventory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MissingData(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message suitable for HTTP responses. Infrastructure errors collapse to
    /// a generic message so internals never leak to callers.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_) | Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn invalid_state_names_both_states() {
        let err = ServiceError::invalid_state("material issue 7", "PENDING", "PICKED");
        let msg = err.to_string();
        assert!(msg.contains("PENDING"));
        assert!(msg.contains("PICKED"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn insufficient_inventory_names_both_quantities() {
        let err = ServiceError::insufficient_inventory(dec!(7), dec!(5));
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('5'));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let err = ServiceError::DatabaseError(DbErr::Custom("secret dsn".into()));
        assert_eq!(err.response_message(), "Database error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

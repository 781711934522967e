//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Warehouse API                      │
//! │                                                                         │
//! │  Handler → Result<Json<T>, ApiError>                                   │
//! │                                                                         │
//! │  AuthError::MissingCredentials ──────────────► 401 UNAUTHORIZED        │
//! │  AuthError::{MalformedHeader, InvalidToken} ─► 403 FORBIDDEN           │
//! │  CoreError::OwnerMismatch ───────────────────► 403 FORBIDDEN           │
//! │  CoreError::ProductNotFound ─────────────────► 404 NOT_FOUND           │
//! │  ValidationError / bad JSON body ────────────► 400 VALIDATION_ERROR    │
//! │  CoreError::InsufficientStock ───────────────► 409 INSUFFICIENT_STOCK  │
//! │  CoreError::StaleCounters ───────────────────► 409 CONFLICT            │
//! │  CoreError::CounterOverflow ─────────────────► 409 CONFLICT            │
//! │  DbError::* ─────────────────────────────────► 500 DATABASE_ERROR      │
//! │                                                                         │
//! │  Body: { "code": "CONFLICT", "message": "..." }                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store failures and auth rejections never leak their detail to the
//! client. The detail goes to the log instead.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use warehouse_core::{CoreError, ValidationError};
use warehouse_db::DbError;

use crate::auth::AuthError;
use crate::services::ServiceError;

/// Error body returned to HTTP clients.
///
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for 1b4e…: available 0"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No credential supplied (401)
    Unauthorized,

    /// Credential rejected, or caller may not see the resource (403)
    Forbidden,

    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Sale attempted with no stock left (409)
    InsufficientStock,

    /// Caller's view of the record is out of date (409)
    Conflict,

    /// Store operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts store errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        // Log the actual error but return a generic message
        tracing::error!(error = %err, "Store operation failed");
        ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::StaleCounters { .. } | CoreError::CounterOverflow { .. } => {
                ApiError::new(ErrorCode::Conflict, err.to_string())
            }
            CoreError::OwnerMismatch { .. } => ApiError::new(ErrorCode::Forbidden, "Forbidden"),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(e) => e.into(),
            ServiceError::Store(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::new(ErrorCode::Unauthorized, "Unauthorized"),
            AuthError::MalformedHeader | AuthError::InvalidToken(_) => {
                ApiError::new(ErrorCode::Forbidden, "Forbidden")
            }
            AuthError::InvalidClaims(e) => e.into(),
            AuthError::Signing(e) => {
                tracing::error!(error = %e, "Token signing failed");
                ApiError::internal("Failed to issue token")
            }
        }
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Missing or mistyped query parameters.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warehouse_core::StockLevel;

    #[test]
    fn test_core_error_mapping() {
        let stale: ApiError = CoreError::StaleCounters {
            id: "x".into(),
            expected: StockLevel::new(10, 0),
            actual: StockLevel::new(9, 1),
        }
        .into();
        assert_eq!(stale.code, ErrorCode::Conflict);
        assert_eq!(stale.code.status(), StatusCode::CONFLICT);

        let empty: ApiError = CoreError::InsufficientStock {
            id: "x".into(),
            available: 0,
        }
        .into();
        assert_eq!(empty.code, ErrorCode::InsufficientStock);
        assert_eq!(empty.code.status(), StatusCode::CONFLICT);

        let saturated: ApiError = CoreError::CounterOverflow { id: "x".into() }.into();
        assert_eq!(saturated.code, ErrorCode::Conflict);

        let missing: ApiError = CoreError::ProductNotFound("x".into()).into();
        assert_eq!(missing.code.status(), StatusCode::NOT_FOUND);

        let mismatch: ApiError = CoreError::OwnerMismatch {
            requested: "b@x.com".into(),
            caller: "a@x.com".into(),
        }
        .into();
        assert_eq!(mismatch.code.status(), StatusCode::FORBIDDEN);
        assert!(!mismatch.message.contains("b@x.com"));
    }

    #[test]
    fn test_auth_error_mapping() {
        let missing: ApiError = AuthError::MissingCredentials.into();
        assert_eq!(missing.code.status(), StatusCode::UNAUTHORIZED);

        let invalid: ApiError = AuthError::InvalidToken("ExpiredSignature".into()).into();
        assert_eq!(invalid.code.status(), StatusCode::FORBIDDEN);
        assert!(!invalid.message.contains("Expired"));
    }

    #[test]
    fn test_store_error_is_generic() {
        let err: ApiError = DbError::QueryFailed("no such table: products".into()).into();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("products"));
    }
}

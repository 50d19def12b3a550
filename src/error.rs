//!
//! # Error Handling
//!
//! This module defines the application-wide error type `AppError`. Service
//! and repository functions return `Result<_, AppError>` — errors travel as
//! values and only the `ResponseError` impl at the HTTP boundary maps each
//! kind to a status code and JSON envelope.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;

/// All error kinds the service layer can produce.
#[derive(Debug)]
pub enum AppError {
    /// Field-level validation failure, including duplicate registration
    /// (HTTP 400, field-specific message).
    Validation(String),
    /// Authentication failure (HTTP 401). The message stays generic: the
    /// client is never told whether a token was missing, expired, or
    /// malformed, nor whether an email or a password was wrong.
    Authentication(String),
    /// Role mismatch on a gated route (HTTP 403). Names the required role.
    Authorization(String),
    /// Missing resource, including cross-tenant access which is deliberately
    /// indistinguishable from absence (HTTP 404).
    NotFound(String),
    /// Unexpected persistence failure (HTTP 400). The underlying detail is
    /// logged server-side; the client sees a non-specific message.
    Storage(String),
    /// Anything else that should not leak details to the client (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Authentication(msg) => write!(f, "Authentication Error: {}", msg),
            AppError::Authorization(msg) => write!(f, "Authorization Error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::Authentication(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::Authorization(msg) => HttpResponse::Forbidden().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Storage(msg) => {
                log::error!("storage error: {}", msg);
                HttpResponse::BadRequest().json(json!({
                    "error": "A storage error occurred"
                }))
            }
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

/// `RowNotFound` maps to `NotFound`; every other database error is a storage
/// failure the caller never retries automatically.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Storage(error.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let error = AppError::Validation("Title is required".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Authentication("Invalid email or password".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Authorization("Insufficient permissions. admin role required".into());
        assert_eq!(error.error_response().status(), 403);

        let error = AppError::NotFound("Task not found".into());
        assert_eq!(error.error_response().status(), 404);

        // Storage errors surface as 400 with a non-specific message.
        let error = AppError::Storage("connection reset".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Internal("boom".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::NotFound(_)));
    }
}

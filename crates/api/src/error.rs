use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cragmap_core::error::CoreError;
use cragmap_core::submission::DailyLimitExceeded;
use cragmap_core::types::DbId;
use serde_json::json;

use crate::clients::geocoding::GeocodingError;
use crate::clients::stripe::StripeError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cragmap_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A lookup that is not keyed by id found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller exceeded a usage limit.
    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    /// The resource being created already exists; carries the existing row.
    #[error("Duplicate: {message}")]
    Duplicate {
        message: String,
        existing_id: DbId,
        existing_name: String,
    },

    /// The requested username belongs to someone else.
    #[error("Username is already taken")]
    UsernameTaken { suggestions: Vec<String> },

    /// An external service (geocoder, payment provider) failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::TooManyRequests(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg.clone())
            }
            AppError::Duplicate {
                message,
                existing_id,
                existing_name,
            } => {
                let body = json!({
                    "error": message,
                    "code": "DUPLICATE",
                    "existing_id": existing_id,
                    "existing_name": existing_name,
                });
                return (StatusCode::CONFLICT, axum::Json(body)).into_response();
            }
            AppError::UsernameTaken { suggestions } => {
                let body = json!({
                    "error": "Username is already taken",
                    "code": "USERNAME_TAKEN",
                    "suggestions": suggestions,
                });
                return (StatusCode::CONFLICT, axum::Json(body)).into_response();
            }
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream service error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    "An external service request failed".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

/// Name of the unique constraint a sqlx error violated, if any.
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            db_err.constraint()
        }
        _ => None,
    }
}

/// Whether a sqlx error is a foreign key violation (`23503`).
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503"))
}

// ---------------------------------------------------------------------------
// Outbound client errors
// ---------------------------------------------------------------------------

impl From<GeocodingError> for AppError {
    fn from(err: GeocodingError) -> Self {
        AppError::Upstream(format!("geocoding: {err}"))
    }
}

impl From<StripeError> for AppError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::NotConfigured(key) => {
                AppError::InternalError(format!("Stripe is not configured: missing {key}"))
            }
            other => AppError::Upstream(format!("stripe: {other}")),
        }
    }
}

impl From<DailyLimitExceeded> for AppError {
    fn from(err: DailyLimitExceeded) -> Self {
        AppError::TooManyRequests(err.to_string())
    }
}

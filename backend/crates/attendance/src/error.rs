//! Attendance Error Types
//!
//! Attendance-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::sqlx_error_kind;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::IdParseError;
use thiserror::Error;

pub type AttendanceResult<T> = Result<T, AttendanceError>;

/// Attendance-specific error variants
///
/// Transport mapping is done here once; use cases only return variants.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// Bad coordinate, radius or TTL input
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session expired")]
    SessionExpired,

    /// No bearer credential on the request
    #[error("Missing credential")]
    MissingCredential,

    /// Credential rejected by the identity verifier
    #[error("Invalid credential")]
    InvalidCredential,

    /// Authenticated caller may not perform this action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-SQL record store failure
    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AttendanceError {
    pub fn validation(message: impl Into<String>) -> Self {
        AttendanceError::Validation(message.into())
    }

    /// Status sent to the client; always derived from [`Self::kind`]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AttendanceError::Validation(_) => ErrorKind::BadRequest,
            AttendanceError::SessionNotFound => ErrorKind::NotFound,
            AttendanceError::SessionExpired => ErrorKind::Gone,
            AttendanceError::MissingCredential | AttendanceError::InvalidCredential => {
                ErrorKind::Unauthorized
            }
            AttendanceError::Forbidden(_) => ErrorKind::Forbidden,
            AttendanceError::Database(e) => sqlx_error_kind(e),
            AttendanceError::Store(_) | AttendanceError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Store failures are never retried by the core; the caller decides.
    pub fn is_store_error(&self) -> bool {
        matches!(self, AttendanceError::Database(_) | AttendanceError::Store(_))
    }

    fn log(&self) {
        match self {
            AttendanceError::Database(e) => {
                tracing::error!(error = %e, "Attendance database error");
            }
            AttendanceError::Store(msg) => {
                tracing::error!(message = %msg, "Attendance store error");
            }
            AttendanceError::Internal(msg) => {
                tracing::error!(message = %msg, "Attendance internal error");
            }
            AttendanceError::InvalidCredential => {
                tracing::warn!("Rejected bearer credential");
            }
            _ => {
                tracing::debug!(
                    error = %self,
                    status = self.status_code().as_u16(),
                    "Attendance error"
                );
            }
        }
    }
}

impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        match err {
            // Same classification as `kind()`; the SQL error stays attached.
            AttendanceError::Database(e) => AppError::from(e),
            AttendanceError::SessionExpired => AppError::new(ErrorKind::Gone, err.to_string())
                .with_action("Ask the session owner to open a new session"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for AttendanceError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<platform::client::CredentialError> for AttendanceError {
    fn from(err: platform::client::CredentialError) -> Self {
        match err {
            platform::client::CredentialError::MissingHeader => AttendanceError::MissingCredential,
            platform::client::CredentialError::NotBearer => AttendanceError::InvalidCredential,
        }
    }
}

impl From<IdParseError> for AttendanceError {
    fn from(err: IdParseError) -> Self {
        AttendanceError::Validation(err.to_string())
    }
}

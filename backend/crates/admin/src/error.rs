//! Admin Error Types
//!
//! Admin-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use access::AccessError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::AdminPinError;

/// Admin-specific result type alias
pub type AdminResult<T> = Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    InvalidPinFormat(#[from] AdminPinError),

    #[error("Unknown authentication step: {0}")]
    InvalidStep(u8),

    /// Wrong admin PIN (which one is not disclosed)
    #[error("Invalid PIN")]
    InvalidPin,

    #[error("Admin token required")]
    MissingToken,

    #[error("Invalid admin token")]
    InvalidToken,

    #[error("Admin session expired")]
    TokenExpired,

    /// Errors from the access crate (PIN issuance)
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::InvalidPinFormat(_) | AdminError::InvalidStep(_) => StatusCode::BAD_REQUEST,
            AdminError::InvalidPin
            | AdminError::MissingToken
            | AdminError::InvalidToken
            | AdminError::TokenExpired => StatusCode::UNAUTHORIZED,
            AdminError::Access(e) => e.status_code(),
            AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::InvalidPinFormat(_) | AdminError::InvalidStep(_) => ErrorKind::BadRequest,
            AdminError::InvalidPin
            | AdminError::MissingToken
            | AdminError::InvalidToken
            | AdminError::TokenExpired => ErrorKind::Unauthorized,
            AdminError::Access(e) => e.kind(),
            AdminError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AdminError::Access(e) => e.to_app_error(),
            AdminError::Internal(_) => AppError::internal("Internal server error"),
            AdminError::TokenExpired => {
                AppError::unauthorized(self.to_string()).with_action("Please sign in again.")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AdminError::Access(e) => e.log(),
            AdminError::Internal(msg) => {
                tracing::error!(message = %msg, "Admin internal error");
            }
            AdminError::InvalidPin | AdminError::InvalidToken => {
                tracing::warn!(error = %self, "Admin authentication failed");
            }
            _ => {
                tracing::debug!(error = %self, "Admin error");
            }
        }
    }
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AdminError::InvalidPinFormat(AdminPinError::Malformed).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AdminError::InvalidStep(3).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AdminError::InvalidPin.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AdminError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AdminError::Access(AccessError::PinAlreadyExists).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_access_errors_keep_their_message() {
        let app = AdminError::from(AccessError::PinAlreadyExists).to_app_error();
        assert_eq!(app.message(), "This PIN already exists for the course");
        assert_eq!(app.status_code(), 409);
    }
}

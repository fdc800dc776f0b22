//! Access Error Types
//!
//! Access-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::entity::RejectReason;
use crate::domain::value_object::{CourseId, CourseIdError, DeviceIdError, PinCodeError};

/// Access-specific result type alias
pub type AccessResult<T> = Result<T, AccessError>;

const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable";

#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    InvalidCourseId(#[from] CourseIdError),

    #[error(transparent)]
    InvalidPin(#[from] PinCodeError),

    #[error(transparent)]
    InvalidDeviceId(#[from] DeviceIdError),

    /// Unknown PIN for this course
    #[error("Invalid PIN")]
    PinNotFound,

    /// Known PIN that may not be redeemed
    #[error("{}", .0.message())]
    PinRejected(RejectReason),

    /// Admin issuance of a PIN that already exists for the course
    #[error("This PIN already exists for the course")]
    PinAlreadyExists,

    /// No `Authorization: Bearer <deviceId>` on a content request
    #[error("Device identification required")]
    DeviceRequired { course_id: CourseId },

    /// Bearer device differs from the one the grant was issued to
    #[error("Access was granted to a different device")]
    DeviceMismatch { course_id: CourseId },

    /// No bound, unexpired PIN for this course and device
    #[error("Access denied for this course")]
    AccessDenied { course_id: CourseId },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccessError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccessError::InvalidCourseId(_)
            | AccessError::InvalidPin(_)
            | AccessError::InvalidDeviceId(_) => StatusCode::BAD_REQUEST,
            AccessError::PinNotFound
            | AccessError::PinRejected(_)
            | AccessError::DeviceRequired { .. }
            | AccessError::DeviceMismatch { .. }
            | AccessError::AccessDenied { .. } => StatusCode::UNAUTHORIZED,
            AccessError::PinAlreadyExists => StatusCode::CONFLICT,
            AccessError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AccessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::InvalidCourseId(_)
            | AccessError::InvalidPin(_)
            | AccessError::InvalidDeviceId(_) => ErrorKind::BadRequest,
            AccessError::PinNotFound
            | AccessError::PinRejected(_)
            | AccessError::DeviceRequired { .. }
            | AccessError::DeviceMismatch { .. }
            | AccessError::AccessDenied { .. } => ErrorKind::Unauthorized,
            AccessError::PinAlreadyExists => ErrorKind::Conflict,
            AccessError::Database(_) => ErrorKind::ServiceUnavailable,
            AccessError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// PIN-entry page the client should return to, if any
    pub fn redirect_to(&self) -> Option<String> {
        match self {
            AccessError::DeviceRequired { course_id }
            | AccessError::DeviceMismatch { course_id }
            | AccessError::AccessDenied { course_id } => Some(course_id.pin_entry_path()),
            _ => None,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let error = match self {
            // Storage details stay in the logs
            AccessError::Database(_) => AppError::service_unavailable(SERVICE_UNAVAILABLE)
                .with_action("Please try again later."),
            AccessError::Internal(_) => AppError::internal("Internal server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        };

        match self.redirect_to() {
            Some(path) => error.with_redirect(path),
            None => error,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AccessError::Database(e) => {
                tracing::error!(error = %e, "Access database error");
            }
            AccessError::Internal(msg) => {
                tracing::error!(message = %msg, "Access internal error");
            }
            AccessError::PinNotFound => {
                tracing::warn!("Unknown PIN submitted");
            }
            AccessError::PinRejected(reason) => {
                tracing::warn!(reason = reason.code(), "PIN redemption rejected");
            }
            AccessError::DeviceMismatch { course_id } | AccessError::AccessDenied { course_id } => {
                tracing::warn!(course_id = %course_id, error = %self, "Content access refused");
            }
            _ => {
                tracing::debug!(error = %self, "Access error");
            }
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

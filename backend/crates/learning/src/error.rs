//! Learning Error Types
//!
//! Learning-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use access::domain::value_object::{CourseId, CourseIdError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::certificate::StudentNameError;
use crate::domain::progression::ProgressionError;
use crate::domain::quiz::QuizError;

/// Learning-specific result type alias
pub type LearningResult<T> = Result<T, LearningError>;

#[derive(Debug, Error)]
pub enum LearningError {
    #[error(transparent)]
    InvalidCourseId(#[from] CourseIdError),

    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    InvalidStudentName(#[from] StudentNameError),

    /// Certificate requested before the final assessment was passed
    #[error("Pass the final assessment to receive a certificate")]
    CertificateNotEarned,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LearningError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LearningError::InvalidCourseId(_)
            | LearningError::Quiz(_)
            | LearningError::InvalidStudentName(_) => StatusCode::BAD_REQUEST,
            LearningError::CourseNotFound(_) => StatusCode::NOT_FOUND,
            LearningError::Progression(e) => match e {
                ProgressionError::ModuleOutOfRange { .. } => StatusCode::NOT_FOUND,
                ProgressionError::ModuleLocked { .. }
                | ProgressionError::FinalAssessmentLocked { .. } => StatusCode::FORBIDDEN,
                ProgressionError::InvalidTransition { .. }
                | ProgressionError::SessionCompleted => StatusCode::CONFLICT,
                ProgressionError::EmptyCourse => StatusCode::INTERNAL_SERVER_ERROR,
            },
            LearningError::CertificateNotEarned => StatusCode::CONFLICT,
            LearningError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self.status_code() {
            StatusCode::BAD_REQUEST => ErrorKind::BadRequest,
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            StatusCode::FORBIDDEN => ErrorKind::Forbidden,
            StatusCode::CONFLICT => ErrorKind::Conflict,
            _ => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            LearningError::Internal(_)
            | LearningError::Progression(ProgressionError::EmptyCourse) => {
                AppError::internal("Internal server error")
            }
            LearningError::Progression(ProgressionError::FinalAssessmentLocked { .. }) => {
                AppError::new(self.kind(), self.to_string())
                    .with_action("Complete every module quiz first.")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            LearningError::Internal(msg) => {
                tracing::error!(message = %msg, "Learning internal error");
            }
            LearningError::Progression(ProgressionError::EmptyCourse) => {
                tracing::error!(error = %self, "Course without modules reached the engine");
            }
            _ => {
                tracing::debug!(error = %self, "Learning error");
            }
        }
    }
}

impl From<LearningError> for AppError {
    fn from(err: LearningError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for LearningError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

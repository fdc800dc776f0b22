//! HTTP Handlers

use std::sync::Arc;

use access::application::{AccessConfig, IssuePinInput, IssuePinUseCase};
use access::domain::repository::PinRepository;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};

use crate::application::AdminAuthUseCase;
use crate::application::config::AdminConfig;
use crate::domain::AdminClaims;
use crate::error::{AdminError, AdminResult};
use crate::presentation::dto::{
    AdminAuthRequest, AdminSessionResponse, AdminStepResponse, AdminTokenResponse,
    IssuePinRequest, IssuePinResponse,
};

/// Shared state for admin handlers
#[derive(Clone)]
pub struct AdminAppState<R>
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    pub pins: Arc<R>,
    pub config: Arc<AdminConfig>,
    /// Shared with the access router so issued PINs redeem there
    pub access: Arc<AccessConfig>,
}

// ============================================================================
// Authentication
// ============================================================================

/// POST /api/admin-auth
pub async fn admin_auth<R>(
    State(state): State<AdminAppState<R>>,
    Json(req): Json<AdminAuthRequest>,
) -> AdminResult<Response>
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    let use_case = AdminAuthUseCase::new(state.config.clone());

    match req.step {
        1 => match use_case.verify_first(&req.pin) {
            Ok(()) => Ok(Json(AdminStepResponse {
                valid: true,
                message: None,
            })
            .into_response()),
            Err(e) if e.status_code().is_client_error() => {
                e.log();
                Ok((
                    e.status_code(),
                    Json(AdminStepResponse {
                        valid: false,
                        message: Some(e.to_string()),
                    }),
                )
                    .into_response())
            }
            Err(e) => Err(e),
        },
        2 => match use_case.verify_both(&req.pin1, &req.pin2) {
            Ok(issued) => Ok(Json(AdminTokenResponse {
                success: true,
                token: Some(issued.token),
                expires: Some(issued.claims.expires_at_ms),
                message: None,
            })
            .into_response()),
            Err(e) if e.status_code().is_client_error() => {
                e.log();
                Ok((
                    e.status_code(),
                    Json(AdminTokenResponse {
                        success: false,
                        token: None,
                        expires: None,
                        message: Some(e.to_string()),
                    }),
                )
                    .into_response())
            }
            Err(e) => Err(e),
        },
        other => Err(AdminError::InvalidStep(other)),
    }
}

// ============================================================================
// Admin-only routes
// ============================================================================

/// GET /api/admin/session
pub async fn admin_session(Extension(claims): Extension<AdminClaims>) -> Json<AdminSessionResponse> {
    Json(AdminSessionResponse {
        token_id: claims.token_id.to_string(),
        expires_at_ms: claims.expires_at_ms,
    })
}

/// POST /api/admin/pins
pub async fn issue_pin<R>(
    State(state): State<AdminAppState<R>>,
    Extension(claims): Extension<AdminClaims>,
    Json(req): Json<IssuePinRequest>,
) -> AdminResult<(StatusCode, Json<IssuePinResponse>)>
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    let use_case = IssuePinUseCase::new(state.pins.clone(), state.access.clone());
    let output = use_case
        .execute(IssuePinInput {
            course_id: req.course_id,
            pin: req.pin,
            usage_limit: req.usage_limit,
            expires_at_ms: req.expires_at_ms,
        })
        .await?;

    tracing::info!(
        token_id = %claims.token_id,
        course_id = %output.pin.course_id,
        pin_id = %output.pin.id,
        "Admin issued course PIN"
    );

    Ok((
        StatusCode::CREATED,
        Json(IssuePinResponse {
            pin_id: output.pin.id.to_string(),
            course_id: output.pin.course_id.to_string(),
            pin: output.code,
            usage_limit: output.pin.usage_limit,
            expires_at_ms: output.pin.expires_at_ms,
            created_at: output.pin.created_at.to_rfc3339(),
        }),
    ))
}

//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::cookie::{extract_cookie, set_cookie_header};

use crate::application::config::AccessConfig;
use crate::application::{CheckGrantUseCase, ValidatePinInput, ValidatePinUseCase};
use crate::domain::repository::PinRepository;
use crate::domain::value_object::{CourseId, DeviceId};
use crate::error::{AccessError, AccessResult};
use crate::presentation::dto::{
    AccessStatusResponse, DeviceResponse, ValidatePinRequest, ValidatePinResponse,
};

/// Shared state for access handlers
#[derive(Clone)]
pub struct AccessAppState<R>
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AccessConfig>,
}

// ============================================================================
// PIN Validation
// ============================================================================

/// POST /api/pins/validate
pub async fn validate_pin<R>(
    State(state): State<AccessAppState<R>>,
    Json(req): Json<ValidatePinRequest>,
) -> AccessResult<Response>
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    let requested_course = req.course_id.clone();
    let use_case = ValidatePinUseCase::new(state.repo.clone(), state.config.clone());

    let input = ValidatePinInput {
        course_id: req.course_id,
        pin: req.pin,
        device_id: req.device_id,
    };

    match use_case.execute(input).await {
        Ok(output) => {
            let cookie = set_cookie_header(&state.config.grant_cookie(), &output.grant_token);
            let message = if output.device_linked {
                "PIN accepted. This device is now linked to the course."
            } else {
                "PIN accepted."
            };

            Ok((
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(ValidatePinResponse {
                    valid: true,
                    message: message.to_string(),
                    course_id: output.course_id.to_string(),
                    device_linked: output.device_linked,
                    expires_at_ms: Some(output.expires_at_ms),
                }),
            )
                .into_response())
        }
        // Validation and rejection keep the response shape; no cookie
        Err(e) if e.status_code().is_client_error() => {
            e.log();
            Ok((
                e.status_code(),
                Json(ValidatePinResponse {
                    valid: false,
                    message: e.to_string(),
                    course_id: requested_course,
                    device_linked: false,
                    expires_at_ms: None,
                }),
            )
                .into_response())
        }
        Err(e) => Err(e),
    }
}

/// DELETE /api/pins/access
pub async fn clear_access<R>(State(state): State<AccessAppState<R>>) -> impl IntoResponse
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    let cookie = state.config.grant_cookie().build_delete_cookie();
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

// ============================================================================
// Devices
// ============================================================================

/// POST /api/devices
///
/// For clients without a stored identifier. Nothing is persisted until the
/// device redeems a PIN.
pub async fn issue_device() -> (StatusCode, Json<DeviceResponse>) {
    let device_id = DeviceId::generate();
    tracing::debug!(device = %device_id.tag(), "Device identifier issued");

    (
        StatusCode::CREATED,
        Json(DeviceResponse {
            device_id: device_id.to_string(),
        }),
    )
}

// ============================================================================
// Access Status
// ============================================================================

/// GET /api/courses/{course_id}/access/status
pub async fn access_status<R>(
    State(state): State<AccessAppState<R>>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
) -> AccessResult<Json<AccessStatusResponse>>
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    let course_id = CourseId::new(&course_id).map_err(AccessError::from)?;
    let token = extract_cookie(&headers, &state.config.grant_cookie_name);

    let grant = CheckGrantUseCase::new(state.config.clone()).execute(token.as_deref(), &course_id);

    Ok(Json(AccessStatusResponse {
        course_id: course_id.to_string(),
        granted: grant.is_some(),
        expires_at_ms: grant.map(|g| g.expires_at_ms),
    }))
}

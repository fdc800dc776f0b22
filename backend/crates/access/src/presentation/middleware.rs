//! Access Middleware
//!
//! Guards every course-content route. The grant cookie is the edge check;
//! the bearer device id and the PIN store are checked behind it on every
//! request.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use platform::client::extract_bearer;
use platform::cookie::extract_cookie;

use crate::application::config::AccessConfig;
use crate::application::{AuthorizeContentUseCase, CheckGrantUseCase};
use crate::domain::repository::PinRepository;
use crate::domain::value_object::{CourseId, DeviceId};
use crate::error::AccessError;

/// Route parameter holding the course id
pub const COURSE_ID_PARAM: &str = "course_id";

/// Middleware state
#[derive(Clone)]
pub struct CourseAccessState<R>
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AccessConfig>,
}

impl<R> CourseAccessState<R>
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AccessConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }
}

/// Authorized course and device, stored in request extensions
#[derive(Debug, Clone)]
pub struct CourseAccess {
    pub course_id: CourseId,
    pub device_id: DeviceId,
}

/// Middleware that requires course access for `{course_id}` routes
pub async fn require_course_access<R>(
    State(state): State<CourseAccessState<R>>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    let course_id = match params.get(COURSE_ID_PARAM).map(CourseId::new) {
        Some(Ok(course_id)) => course_id,
        Some(Err(e)) => return AccessError::from(e).into_response(),
        None => {
            return AccessError::Internal("route has no course_id parameter".to_string())
                .into_response();
        }
    };

    let headers = req.headers();

    // 1. Grant cookie
    let token = extract_cookie(headers, &state.config.grant_cookie_name);
    let grant = match CheckGrantUseCase::new(state.config.clone()).execute(token.as_deref(), &course_id)
    {
        Some(grant) => grant,
        None => {
            tracing::debug!(course_id = %course_id, "No valid access grant, redirecting");
            return Redirect::temporary(&course_id.pin_entry_path()).into_response();
        }
    };

    // 2. Bearer device must be the one the grant was issued to
    let device_id = match extract_bearer(headers).map(DeviceId::new) {
        Some(Ok(device_id)) => device_id,
        _ => return AccessError::DeviceRequired { course_id }.into_response(),
    };
    if !grant.matches_device(&device_id) {
        return AccessError::DeviceMismatch { course_id }.into_response();
    }

    // 3. PIN store
    let use_case = AuthorizeContentUseCase::new(state.repo.clone());
    if let Err(e) = use_case.execute(&course_id, &device_id).await {
        return e.into_response();
    }

    req.extensions_mut().insert(CourseAccess {
        course_id,
        device_id,
    });

    next.run(req).await
}

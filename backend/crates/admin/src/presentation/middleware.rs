//! Admin Middleware
//!
//! Every admin request carries `Authorization: Bearer <admin token>`.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::extract_bearer;

use crate::application::CheckAdminTokenUseCase;
use crate::application::config::AdminConfig;

/// Middleware that requires a valid admin token
///
/// Inserts `AdminClaims` into request extensions.
pub async fn require_admin_token(
    State(config): State<Arc<AdminConfig>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = extract_bearer(req.headers());

    let claims = match CheckAdminTokenUseCase::new(config).execute(token) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(claims);
    next.run(req).await
}

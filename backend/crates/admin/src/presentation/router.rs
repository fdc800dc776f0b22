//! Admin Router

use std::sync::Arc;

use access::AccessConfig;
use access::domain::repository::PinRepository;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitState, enforce_rate_limit};

use crate::application::config::AdminConfig;
use crate::presentation::handlers::{self, AdminAppState};
use crate::presentation::middleware::require_admin_token;

/// Create the Admin router for any PIN repository
///
/// `access_config` must be the one the access router uses, so PINs issued
/// here carry the digest it looks up.
pub fn admin_router<R>(pins: R, config: AdminConfig, access_config: AccessConfig) -> Router
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    let rate_limit = RateLimitState::new(
        Arc::new(InMemoryRateLimitStore::new()),
        config.auth_rate_limit.clone(),
        "admin-auth",
    );

    let config = Arc::new(config);
    let state = AdminAppState {
        pins: Arc::new(pins),
        config: config.clone(),
        access: Arc::new(access_config),
    };

    let protected = Router::new()
        .route("/admin/session", get(handlers::admin_session))
        .route("/admin/pins", post(handlers::issue_pin::<R>))
        .route_layer(middleware::from_fn_with_state(config, require_admin_token));

    Router::new()
        .route(
            "/admin-auth",
            post(handlers::admin_auth::<R>).layer(middleware::from_fn_with_state(
                rate_limit,
                enforce_rate_limit::<InMemoryRateLimitStore>,
            )),
        )
        .merge(protected)
        .with_state(state)
}

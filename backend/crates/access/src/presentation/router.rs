//! Access Router

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitState, enforce_rate_limit};
use std::sync::Arc;

use crate::application::config::AccessConfig;
use crate::domain::repository::PinRepository;
use crate::presentation::handlers::{self, AccessAppState};

/// Create the Access router for any repository implementation
pub fn access_router<R>(repo: R, config: AccessConfig) -> Router
where
    R: PinRepository + Clone + Send + Sync + 'static,
{
    let rate_limit = RateLimitState::new(
        Arc::new(InMemoryRateLimitStore::new()),
        config.validate_rate_limit.clone(),
        "pins-validate",
    );

    let state = AccessAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/pins/validate",
            post(handlers::validate_pin::<R>).layer(middleware::from_fn_with_state(
                rate_limit,
                enforce_rate_limit::<InMemoryRateLimitStore>,
            )),
        )
        .route("/pins/access", delete(handlers::clear_access::<R>))
        .route("/devices", post(handlers::issue_device))
        .route(
            "/courses/{course_id}/access/status",
            get(handlers::access_status::<R>),
        )
        .with_state(state)
}

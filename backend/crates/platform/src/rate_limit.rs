//! Rate Limiting Infrastructure
//!
//! Fixed-window counters keyed by `"{scope}:{client ip}"`, plus an axum
//! middleware that answers 429 once a window is exhausted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::client::request_client_ip;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Key on `X-Forwarded-For` (only behind a reverse proxy that sets it)
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
            trust_forwarded_for: false,
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            trust_forwarded_for: false,
        }
    }

    pub fn trusting_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Whole seconds until the window resets (at least 1)
    pub fn retry_after_secs(&self, now_ms: i64) -> i64 {
        let remaining_ms = (self.reset_at_ms - now_ms).max(0);
        ((remaining_ms + 999) / 1000).max(1)
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment rate limit counter
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

/// Stale windows are swept once this many keys are tracked
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at_ms: i64,
    count: u32,
}

/// Process-local fixed-window store
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_at(&self, key: &str, config: &RateLimitConfig, now_ms: i64) -> RateLimitResult {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if windows.len() >= PRUNE_THRESHOLD {
            let window_ms = config.window_ms();
            windows.retain(|_, w| w.started_at_ms + window_ms > now_ms);
        }

        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at_ms: now_ms,
            count: 0,
        });

        if now_ms >= window.started_at_ms + config.window_ms() {
            *window = Window {
                started_at_ms: now_ms,
                count: 0,
            };
        }

        let reset_at_ms = window.started_at_ms + config.window_ms();

        if window.count >= config.max_requests {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at_ms,
            };
        }

        window.count += 1;
        RateLimitResult {
            allowed: true,
            remaining: config.max_requests - window.count,
            reset_at_ms,
        }
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.check_at(key, config, Utc::now().timestamp_millis()))
    }
}

/// Middleware state
pub struct RateLimitState<S> {
    pub store: Arc<S>,
    pub config: RateLimitConfig,
    /// Prefix separating counters of different endpoints
    pub scope: &'static str,
}

impl<S> RateLimitState<S> {
    pub fn new(store: Arc<S>, config: RateLimitConfig, scope: &'static str) -> Self {
        Self {
            store,
            config,
            scope,
        }
    }
}

// Manual impl: `S` itself need not be Clone behind the Arc.
impl<S> Clone for RateLimitState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            scope: self.scope,
        }
    }
}

/// Middleware limiting requests per client IP
///
/// Store failures let the request through.
pub async fn enforce_rate_limit<S>(
    State(state): State<RateLimitState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: RateLimitStore + Send + Sync + 'static,
{
    let client_ip = request_client_ip(
        req.headers(),
        req.extensions(),
        state.config.trust_forwarded_for,
    )
    .map(|ip| ip.to_string())
    .unwrap_or_else(|| "unknown".to_string());
    let key = format!("{}:{}", state.scope, client_ip);

    let result = match state.store.check_and_increment(&key, &state.config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, scope = state.scope, "Rate limit store failed");
            return next.run(req).await;
        }
    };

    if !result.allowed {
        let retry_after = result.retry_after_secs(Utc::now().timestamp_millis());
        tracing::warn!(
            scope = state.scope,
            client_ip = %client_ip,
            retry_after,
            "Rate limit exceeded"
        );

        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "message": "Too many requests. Please try again later."
            })),
        )
            .into_response();
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return response;
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    #[test]
    fn test_fixed_window_counts() {
        let store = InMemoryRateLimitStore::new();
        let config = RateLimitConfig::new(2, 60);

        let first = store.check_at("k", &config, 1_000);
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert_eq!(first.reset_at_ms, 61_000);

        assert!(store.check_at("k", &config, 2_000).allowed);
        let third = store.check_at("k", &config, 3_000);
        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);

        // Separate key, separate counter
        assert!(store.check_at("other", &config, 3_000).allowed);
    }

    #[test]
    fn test_window_resets() {
        let store = InMemoryRateLimitStore::new();
        let config = RateLimitConfig::new(1, 60);

        assert!(store.check_at("k", &config, 0).allowed);
        assert!(!store.check_at("k", &config, 59_999).allowed);
        assert!(store.check_at("k", &config, 60_000).allowed);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let result = RateLimitResult {
            allowed: false,
            remaining: 0,
            reset_at_ms: 10_500,
        };
        assert_eq!(result.retry_after_secs(0), 11);
        assert_eq!(result.retry_after_secs(20_000), 1);
    }

    #[tokio::test]
    async fn test_middleware_returns_429() {
        let app = limited_app(RateLimitConfig::new(1, 60));

        let request = || {
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .unwrap()
        };

        let ok = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let limited = app.oneshot(request()).await.unwrap();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(limited.headers().contains_key(header::RETRY_AFTER));
    }

    fn limited_app(config: RateLimitConfig) -> Router {
        let state = RateLimitState::new(Arc::new(InMemoryRateLimitStore::new()), config, "test");
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                state,
                enforce_rate_limit::<InMemoryRateLimitStore>,
            ))
    }

    fn from_forwarded(ip: &str) -> Request<Body> {
        let mut request = Request::builder()
            .uri("/")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(axum::extract::ConnectInfo::<std::net::SocketAddr>(
                "198.51.100.1:4000".parse().unwrap(),
            ));
        request
    }

    #[tokio::test]
    async fn test_rotating_forwarded_for_shares_one_bucket() {
        let app = limited_app(RateLimitConfig::new(2, 60));

        let mut statuses = Vec::new();
        for i in 0..5 {
            let response = app
                .clone()
                .oneshot(from_forwarded(&format!("10.0.0.{i}")))
                .await
                .unwrap();
            statuses.push(response.status());
        }

        assert_eq!(&statuses[..2], &[StatusCode::OK, StatusCode::OK]);
        assert!(statuses[2..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
    }

    #[tokio::test]
    async fn test_trusted_proxy_keys_on_forwarded_for() {
        let app = limited_app(RateLimitConfig::new(1, 60).trusting_forwarded_for(true));

        let first = app.clone().oneshot(from_forwarded("10.0.0.1")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let other = app.clone().oneshot(from_forwarded("10.0.0.2")).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
        let again = app.oneshot(from_forwarded("10.0.0.1")).await.unwrap();
        assert_eq!(again.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}

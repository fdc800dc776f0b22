//! Application Configuration
//!
//! Configuration for the Admin application layer. There is no `Default`:
//! the two PIN hashes must come from the deployment.

use std::time::Duration;

use platform::rate_limit::RateLimitConfig;
use platform::secret::HashedPin;

use crate::domain::AdminPin;
use crate::error::{AdminError, AdminResult};

/// Admin application configuration
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Argon2id hash of the first admin PIN
    pub pin1: HashedPin,
    /// Argon2id hash of the second admin PIN
    pub pin2: HashedPin,
    /// HMAC key for admin tokens (32 bytes)
    pub token_secret: [u8; 32],
    /// Admin token lifetime (4 hours)
    pub token_ttl: Duration,
    /// Limit for `POST /admin-auth` per client IP
    pub auth_rate_limit: RateLimitConfig,
}

impl AdminConfig {
    pub fn new(pin1: HashedPin, pin2: HashedPin, token_secret: [u8; 32]) -> Self {
        Self {
            pin1,
            pin2,
            token_secret,
            token_ttl: Duration::from_secs(4 * 3600),
            auth_rate_limit: RateLimitConfig::new(5, 60),
        }
    }

    /// Create config with a random token secret
    pub fn with_random_secret(pin1: HashedPin, pin2: HashedPin) -> Self {
        Self::new(pin1, pin2, platform::crypto::random_secret())
    }

    /// Create config for development from clear text PINs
    pub fn development(pin1: &str, pin2: &str) -> AdminResult<Self> {
        let hash = |raw: &str| -> AdminResult<HashedPin> {
            AdminPin::new(raw)?
                .hash()
                .map_err(|e| AdminError::Internal(e.to_string()))
        };
        Ok(Self::with_random_secret(hash(pin1)?, hash(pin2)?))
    }

    /// Get token TTL in milliseconds
    pub fn token_ttl_ms(&self) -> i64 {
        self.token_ttl.as_millis() as i64
    }
}

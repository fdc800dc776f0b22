//! Application Configuration
//!
//! Configuration for the Access application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::rate_limit::RateLimitConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Access application configuration
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Access grant cookie name
    pub grant_cookie_name: String,
    /// HMAC key for access grants (32 bytes)
    pub grant_secret: [u8; 32],
    /// HMAC key for stored PIN digests (32 bytes); changing it orphans
    /// every stored PIN
    pub pin_secret: [u8; 32],
    /// Access grant lifetime (24 hours)
    pub grant_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Limit for `POST /pins/validate` per client IP
    pub validate_rate_limit: RateLimitConfig,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            grant_cookie_name: "course-access".to_string(),
            grant_secret: [0u8; 32],
            pin_secret: [0u8; 32],
            grant_ttl: Duration::from_secs(24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            validate_rate_limit: RateLimitConfig::new(10, 60),
        }
    }
}

impl AccessConfig {
    /// Create config with random grant and PIN secrets
    pub fn with_random_secret() -> Self {
        Self {
            grant_secret: platform::crypto::random_secret(),
            pin_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get grant TTL in milliseconds
    pub fn grant_ttl_ms(&self) -> i64 {
        self.grant_ttl.as_millis() as i64
    }

    /// Cookie attributes of the access grant
    pub fn grant_cookie(&self) -> CookieConfig {
        CookieConfig::new(
            self.grant_cookie_name.clone(),
            self.grant_ttl,
            self.cookie_secure,
            self.cookie_same_site,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AccessConfig::default();
        assert_eq!(config.grant_cookie_name, "course-access");
        assert_eq!(config.grant_ttl_ms(), 86_400_000);
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Strict);
        assert_eq!(config.validate_rate_limit.max_requests, 10);
    }

    #[test]
    fn test_with_random_secret() {
        let a = AccessConfig::with_random_secret();
        let b = AccessConfig::with_random_secret();
        assert_ne!(a.grant_secret, [0u8; 32]);
        assert_ne!(a.grant_secret, b.grant_secret);
        assert_ne!(a.pin_secret, a.grant_secret);
        assert_ne!(a.pin_secret, b.pin_secret);
    }

    #[test]
    fn test_development_config() {
        let config = AccessConfig::development();
        assert!(!config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Strict);
    }

    #[test]
    fn test_grant_cookie_attributes() {
        let cookie = AccessConfig::default().grant_cookie().build_set_cookie("v");
        assert!(cookie.starts_with("course-access=v"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=86400"));
    }
}

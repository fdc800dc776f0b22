//! Application Configuration
//!
//! Configuration for the Learning application layer.

/// Learning application configuration
#[derive(Debug, Clone)]
pub struct LearningConfig {
    /// HMAC key for certificate signatures (32 bytes)
    pub certificate_secret: [u8; 32],
    /// Issuer printed on certificates
    pub issuer: String,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            certificate_secret: [0u8; 32],
            issuer: "TobiXTech Academy".to_string(),
        }
    }
}

impl LearningConfig {
    /// Create config with a random certificate secret
    pub fn with_random_secret() -> Self {
        Self {
            certificate_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development
    ///
    /// Certificates signed with a random key stop verifying after a restart.
    pub fn development() -> Self {
        Self::with_random_secret()
    }
}

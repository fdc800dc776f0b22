//! Device ID Value Object
//!
//! Opaque identifier generated and kept by the client. It correlates a
//! browser with a redeemed PIN and is presented as a bearer credential on
//! content requests.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const DEVICE_ID_MAX_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceIdError {
    #[error("deviceId is required")]
    Empty,

    #[error("deviceId is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("deviceId must be visible ASCII without whitespace")]
    InvalidCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(input: impl AsRef<str>) -> Result<Self, DeviceIdError> {
        let value = input.as_ref();

        if value.is_empty() {
            return Err(DeviceIdError::Empty);
        }
        if value.len() > DEVICE_ID_MAX_LENGTH {
            return Err(DeviceIdError::TooLong {
                length: value.chars().count(),
                max: DEVICE_ID_MAX_LENGTH,
            });
        }
        if !value.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(DeviceIdError::InvalidCharacter);
        }

        Ok(Self(value.to_string()))
    }

    /// Server-minted identifier for clients that do not have one yet
    pub fn generate() -> Self {
        Self(format!("dev_{}", Uuid::new_v4().simple()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 16 hex chars of SHA-256 over the id.
    ///
    /// Embedded in access grants so the cookie ties to a device without
    /// carrying the id itself.
    pub fn tag(&self) -> String {
        let mut digest = platform::crypto::sha256_hex(self.0.as_bytes());
        digest.truncate(16);
        digest
    }
}

impl TryFrom<String> for DeviceId {
    type Error = DeviceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_device_ids() {
        assert!(DeviceId::new("abc-123").is_ok());
        assert!(DeviceId::new("device_1700000000000_k3j4h5").is_ok());
        assert!(DeviceId::new("x".repeat(128)).is_ok());
    }

    #[test]
    fn test_invalid_device_ids() {
        assert_eq!(DeviceId::new(""), Err(DeviceIdError::Empty));
        assert_eq!(
            DeviceId::new("has space"),
            Err(DeviceIdError::InvalidCharacter)
        );
        assert_eq!(
            DeviceId::new("tab\there"),
            Err(DeviceIdError::InvalidCharacter)
        );
        assert_eq!(DeviceId::new("日本"), Err(DeviceIdError::InvalidCharacter));
        assert!(matches!(
            DeviceId::new("x".repeat(129)),
            Err(DeviceIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_generate() {
        let id = DeviceId::generate();
        assert!(id.as_str().starts_with("dev_"));
        assert_eq!(id.as_str().len(), 4 + 32);
        assert_ne!(id, DeviceId::generate());
        assert!(DeviceId::new(id.as_str()).is_ok());
    }

    #[test]
    fn test_tag_is_stable_and_short() {
        let a = DeviceId::new("abc-123").unwrap();
        assert_eq!(a.tag().len(), 16);
        assert_eq!(a.tag(), DeviceId::new("abc-123").unwrap().tag());
        assert_ne!(a.tag(), DeviceId::new("abc-124").unwrap().tag());
    }
}

//! PIN Digest Value Object
//!
//! HMAC-SHA256 over `"{course_id}:{pin}"` keyed with the server's PIN
//! secret, lowercase hex. A plain hash of a 5-digit PIN is reversible by
//! enumeration; without the key the stored digests reveal nothing. Salting
//! with the course id keeps equal PINs of different courses distinct.

use derive_more::Display;

use crate::domain::value_object::{CourseId, PinCode};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct PinDigest(String);

impl PinDigest {
    pub fn compute(secret: &[u8; 32], course_id: &CourseId, pin: &PinCode) -> Self {
        let input = format!("{}:{}", course_id.as_str(), pin.expose());
        Self(platform::crypto::hmac_sha256_hex(secret, input.as_bytes()))
    }

    #[inline]
    pub fn from_db<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

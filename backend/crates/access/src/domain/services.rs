//! Domain Services
//!
//! The access grant is the redesigned `course-access` cookie: instead of
//! carrying `"{courseId}-{pin}"` it holds a signed, expiring claim
//! `"{courseId}~{expiresAtMs}~{deviceTag}"`. Presence alone proves nothing;
//! the signature, expiry, course and device tag are checked on every request.

use platform::crypto::{constant_time_eq, sign_payload, verify_payload};

use crate::domain::value_object::{CourseId, DeviceId};

const GRANT_SEPARATOR: char = '~';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub course_id: CourseId,
    pub expires_at_ms: i64,
    /// `DeviceId::tag()` of the device that redeemed the PIN
    pub device_tag: String,
}

impl AccessGrant {
    pub fn new(course_id: CourseId, device: &DeviceId, now_ms: i64, ttl_ms: i64) -> Self {
        Self {
            course_id,
            expires_at_ms: now_ms + ttl_ms,
            device_tag: device.tag(),
        }
    }

    /// Signed cookie value
    pub fn encode(&self, secret: &[u8; 32]) -> String {
        let payload = format!(
            "{}{sep}{}{sep}{}",
            self.course_id,
            self.expires_at_ms,
            self.device_tag,
            sep = GRANT_SEPARATOR
        );
        sign_payload(secret, &payload)
    }

    /// Verify the signature and parse. Expiry is not checked here.
    pub fn decode(secret: &[u8; 32], token: &str) -> Option<Self> {
        let payload = verify_payload(secret, token)?;

        let mut parts = payload.split(GRANT_SEPARATOR);
        let course_id = CourseId::new(parts.next()?).ok()?;
        let expires_at_ms = parts.next()?.parse::<i64>().ok()?;
        let device_tag = parts.next()?.to_string();
        if parts.next().is_some() || device_tag.is_empty() {
            return None;
        }

        Some(Self {
            course_id,
            expires_at_ms,
            device_tag,
        })
    }

    #[inline]
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }

    /// Unexpired and scoped to `course_id`
    pub fn is_valid_for(&self, course_id: &CourseId, now_ms: i64) -> bool {
        &self.course_id == course_id && !self.is_expired(now_ms)
    }

    pub fn matches_device(&self, device: &DeviceId) -> bool {
        constant_time_eq(self.device_tag.as_bytes(), device.tag().as_bytes())
    }
}

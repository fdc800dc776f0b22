//! Course PIN Entity
//!
//! A purchased/issued PIN unlocking one course. The first successful
//! redemption binds it to the redeeming device; from then on only that
//! device may redeem it until it expires or runs out of uses.

use chrono::{DateTime, Utc};
use kernel::id::PinId;

use crate::domain::value_object::{CourseId, DeviceId, PinDigest};

/// Why a known PIN was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Expired,
    DeviceMismatch,
    UsageExhausted,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::Expired => "expired",
            RejectReason::DeviceMismatch => "device_mismatch",
            RejectReason::UsageExhausted => "usage_exhausted",
        }
    }

    /// User-facing explanation
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::Expired => "This PIN has expired",
            RejectReason::DeviceMismatch => "This PIN is already linked to another device",
            RejectReason::UsageExhausted => "This PIN has reached its usage limit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoursePin {
    pub id: PinId,
    pub course_id: CourseId,
    pub digest: PinDigest,
    /// `None` means unlimited
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
    pub expires_at_ms: Option<i64>,
    /// Set on first successful redemption
    pub device_id: Option<DeviceId>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl CoursePin {
    pub fn new(
        course_id: CourseId,
        digest: PinDigest,
        usage_limit: Option<u32>,
        expires_at_ms: Option<i64>,
    ) -> Self {
        Self {
            id: PinId::new(),
            course_id,
            digest,
            usage_limit,
            usage_count: 0,
            expires_at_ms,
            device_id: None,
            created_at: Utc::now(),
            last_used_at: None,
        }
    }

    #[inline]
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at_ms.is_some_and(|expires| now_ms >= expires)
    }

    #[inline]
    pub fn is_bound_to(&self, device: &DeviceId) -> bool {
        self.device_id.as_ref() == Some(device)
    }

    fn is_exhausted(&self) -> bool {
        self.usage_limit
            .is_some_and(|limit| self.usage_count >= limit)
    }

    /// Check order: expiry, device binding, usage limit.
    pub fn check_redeemable(&self, device: &DeviceId, now_ms: i64) -> Result<(), RejectReason> {
        if self.is_expired(now_ms) {
            return Err(RejectReason::Expired);
        }
        if self.device_id.is_some() && !self.is_bound_to(device) {
            return Err(RejectReason::DeviceMismatch);
        }
        if self.is_exhausted() {
            return Err(RejectReason::UsageExhausted);
        }
        Ok(())
    }

    /// Redeem for `device`. Returns whether the device was newly linked.
    pub fn redeem(&mut self, device: &DeviceId, now: DateTime<Utc>) -> Result<bool, RejectReason> {
        self.check_redeemable(device, now.timestamp_millis())?;

        let device_linked = self.device_id.is_none();
        if device_linked {
            self.device_id = Some(device.clone());
        }
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_used_at = Some(now);

        Ok(device_linked)
    }

    /// Whether `device` may view the course content.
    ///
    /// Exhausting the usage limit stops further redemptions only.
    pub fn grants_content(&self, device: &DeviceId, now_ms: i64) -> bool {
        self.is_bound_to(device) && !self.is_expired(now_ms)
    }
}

//! Repository Traits
//!
//! Interfaces for PIN persistence. Implementations live in the infra layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::{CoursePin, RejectReason};
use crate::domain::value_object::{CourseId, DeviceId, PinDigest};
use crate::error::AccessResult;

/// Result of an atomic redemption attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// No PIN with that digest exists for the course
    NotFound,
    /// PIN exists but may not be redeemed by this device now
    Rejected(RejectReason),
    /// Redeemed; `pin` is the updated record
    Redeemed { pin: CoursePin, device_linked: bool },
}

/// Course PIN repository trait
#[trait_variant::make(PinRepository: Send)]
pub trait LocalPinRepository {
    /// Store a new PIN. Fails with `PinAlreadyExists` on a duplicate digest.
    async fn create(&self, pin: &CoursePin) -> AccessResult<()>;

    /// Find a PIN by course and digest
    async fn find(&self, course_id: &CourseId, digest: &PinDigest)
    -> AccessResult<Option<CoursePin>>;

    /// Check-and-update in one step; concurrent redemptions of the same PIN
    /// are serialized.
    async fn redeem(
        &self,
        course_id: &CourseId,
        digest: &PinDigest,
        device: &DeviceId,
        now: DateTime<Utc>,
    ) -> AccessResult<RedeemOutcome>;

    /// PINs of the course bound to `device`
    async fn find_bound(&self, course_id: &CourseId, device: &DeviceId)
    -> AccessResult<Vec<CoursePin>>;

    /// Delete PINs that expired before `now`
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AccessResult<u64>;
}

//! In-memory Repository Implementation
//!
//! Used by tests and when no database is configured. State lives for the
//! lifetime of the process.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::domain::entity::CoursePin;
use crate::domain::repository::{PinRepository, RedeemOutcome};
use crate::domain::value_object::{CourseId, DeviceId, PinDigest};
use crate::error::{AccessError, AccessResult};

type PinKey = (CourseId, PinDigest);

/// In-memory PIN repository; clones share state
#[derive(Clone, Default)]
pub struct InMemoryAccessRepository {
    pins: Arc<RwLock<HashMap<PinKey, CoursePin>>>,
}

impl InMemoryAccessRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AccessResult<RwLockReadGuard<'_, HashMap<PinKey, CoursePin>>> {
        self.pins
            .read()
            .map_err(|_| AccessError::Internal("PIN store lock poisoned".to_string()))
    }

    fn write(&self) -> AccessResult<RwLockWriteGuard<'_, HashMap<PinKey, CoursePin>>> {
        self.pins
            .write()
            .map_err(|_| AccessError::Internal("PIN store lock poisoned".to_string()))
    }
}

impl PinRepository for InMemoryAccessRepository {
    async fn create(&self, pin: &CoursePin) -> AccessResult<()> {
        let mut pins = self.write()?;
        let key = (pin.course_id.clone(), pin.digest.clone());
        if pins.contains_key(&key) {
            return Err(AccessError::PinAlreadyExists);
        }
        pins.insert(key, pin.clone());
        Ok(())
    }

    async fn find(
        &self,
        course_id: &CourseId,
        digest: &PinDigest,
    ) -> AccessResult<Option<CoursePin>> {
        let key = (course_id.clone(), digest.clone());
        Ok(self.read()?.get(&key).cloned())
    }

    async fn redeem(
        &self,
        course_id: &CourseId,
        digest: &PinDigest,
        device: &DeviceId,
        now: DateTime<Utc>,
    ) -> AccessResult<RedeemOutcome> {
        // Held for check and update together
        let mut pins = self.write()?;
        let key = (course_id.clone(), digest.clone());

        let Some(pin) = pins.get_mut(&key) else {
            return Ok(RedeemOutcome::NotFound);
        };

        Ok(match pin.redeem(device, now) {
            Ok(device_linked) => RedeemOutcome::Redeemed {
                pin: pin.clone(),
                device_linked,
            },
            Err(reason) => RedeemOutcome::Rejected(reason),
        })
    }

    async fn find_bound(
        &self,
        course_id: &CourseId,
        device: &DeviceId,
    ) -> AccessResult<Vec<CoursePin>> {
        Ok(self
            .read()?
            .values()
            .filter(|pin| &pin.course_id == course_id && pin.is_bound_to(device))
            .cloned()
            .collect())
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AccessResult<u64> {
        let now_ms = now.timestamp_millis();
        let mut pins = self.write()?;
        let before = pins.len();
        pins.retain(|_, pin| !pin.is_expired(now_ms));
        Ok((before - pins.len()) as u64)
    }
}

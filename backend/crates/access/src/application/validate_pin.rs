//! Validate PIN Use Case
//!
//! Redeems a PIN for a device and issues the access grant.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AccessConfig;
use crate::domain::repository::{PinRepository, RedeemOutcome};
use crate::domain::services::AccessGrant;
use crate::domain::value_object::{CourseId, DeviceId, PinCode, PinDigest};
use crate::error::{AccessError, AccessResult};

/// Raw request fields, validated by the use case
pub struct ValidatePinInput {
    pub course_id: String,
    pub pin: String,
    pub device_id: String,
}

pub struct ValidatePinOutput {
    pub course_id: CourseId,
    pub device_linked: bool,
    /// Signed cookie value
    pub grant_token: String,
    pub expires_at_ms: i64,
}

pub struct ValidatePinUseCase<R>
where
    R: PinRepository,
{
    repo: Arc<R>,
    config: Arc<AccessConfig>,
}

impl<R> ValidatePinUseCase<R>
where
    R: PinRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccessConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: ValidatePinInput) -> AccessResult<ValidatePinOutput> {
        // Malformed input never reaches the repository
        let course_id = CourseId::new(&input.course_id)?;
        let pin = PinCode::new(&input.pin)?;
        let device_id = DeviceId::new(&input.device_id)?;

        let digest = PinDigest::compute(&self.config.pin_secret, &course_id, &pin);
        let now = Utc::now();

        let device_linked = match self
            .repo
            .redeem(&course_id, &digest, &device_id, now)
            .await?
        {
            RedeemOutcome::NotFound => return Err(AccessError::PinNotFound),
            RedeemOutcome::Rejected(reason) => return Err(AccessError::PinRejected(reason)),
            RedeemOutcome::Redeemed { pin, device_linked } => {
                tracing::info!(
                    course_id = %course_id,
                    pin_id = %pin.id,
                    usage_count = pin.usage_count,
                    device_linked,
                    "PIN redeemed"
                );
                device_linked
            }
        };

        let grant = AccessGrant::new(
            course_id.clone(),
            &device_id,
            now.timestamp_millis(),
            self.config.grant_ttl_ms(),
        );

        Ok(ValidatePinOutput {
            course_id,
            device_linked,
            grant_token: grant.encode(&self.config.grant_secret),
            expires_at_ms: grant.expires_at_ms,
        })
    }
}

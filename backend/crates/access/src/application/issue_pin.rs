//! Issue PIN Use Case
//!
//! Creates a course PIN on behalf of an administrator. The clear PIN is
//! returned exactly once; only its digest is stored.

use std::sync::Arc;

use crate::application::config::AccessConfig;
use crate::domain::entity::CoursePin;
use crate::domain::repository::PinRepository;
use crate::domain::value_object::{CourseId, PinCode, PinDigest};
use crate::error::{AccessError, AccessResult};

/// Attempts at finding an unused random PIN before giving up
const RANDOM_PIN_ATTEMPTS: usize = 8;

pub struct IssuePinInput {
    pub course_id: String,
    /// Random PIN when `None`
    pub pin: Option<String>,
    pub usage_limit: Option<u32>,
    pub expires_at_ms: Option<i64>,
}

pub struct IssuePinOutput {
    pub pin: CoursePin,
    /// Clear text, for display to the issuer only
    pub code: String,
}

pub struct IssuePinUseCase<R>
where
    R: PinRepository,
{
    repo: Arc<R>,
    config: Arc<AccessConfig>,
}

impl<R> IssuePinUseCase<R>
where
    R: PinRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccessConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: IssuePinInput) -> AccessResult<IssuePinOutput> {
        let course_id = CourseId::new(&input.course_id)?;

        if let Some(raw) = input.pin.as_deref() {
            let code = PinCode::new(raw)?;
            return self.store(&course_id, code, &input).await;
        }

        for _ in 0..RANDOM_PIN_ATTEMPTS {
            match self.store(&course_id, PinCode::generate(), &input).await {
                Err(AccessError::PinAlreadyExists) => continue,
                result => return result,
            }
        }

        Err(AccessError::Internal(format!(
            "no unused PIN found for {course_id} after {RANDOM_PIN_ATTEMPTS} attempts"
        )))
    }

    async fn store(
        &self,
        course_id: &CourseId,
        code: PinCode,
        input: &IssuePinInput,
    ) -> AccessResult<IssuePinOutput> {
        let digest = PinDigest::compute(&self.config.pin_secret, course_id, &code);
        // `create` still rejects a duplicate inserted concurrently
        if self.repo.find(course_id, &digest).await?.is_some() {
            return Err(AccessError::PinAlreadyExists);
        }

        let pin = CoursePin::new(
            course_id.clone(),
            digest,
            input.usage_limit,
            input.expires_at_ms,
        );

        self.repo.create(&pin).await?;

        tracing::info!(
            course_id = %course_id,
            pin_id = %pin.id,
            usage_limit = ?pin.usage_limit,
            expires_at_ms = ?pin.expires_at_ms,
            "PIN issued"
        );

        Ok(IssuePinOutput {
            pin,
            code: code.expose().to_string(),
        })
    }
}

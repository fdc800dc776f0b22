//! Authorize Content Use Case
//!
//! Server-side re-check behind the access grant: the device must hold a
//! bound, unexpired PIN for the course.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repository::PinRepository;
use crate::domain::value_object::{CourseId, DeviceId};
use crate::error::{AccessError, AccessResult};

pub struct AuthorizeContentUseCase<R>
where
    R: PinRepository,
{
    repo: Arc<R>,
}

impl<R> AuthorizeContentUseCase<R>
where
    R: PinRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, course_id: &CourseId, device_id: &DeviceId) -> AccessResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        let pins = self.repo.find_bound(course_id, device_id).await?;

        if pins.iter().any(|pin| pin.grants_content(device_id, now_ms)) {
            Ok(())
        } else {
            Err(AccessError::AccessDenied {
                course_id: course_id.clone(),
            })
        }
    }
}

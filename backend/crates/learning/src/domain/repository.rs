//! Repository Traits
//!
//! Progress is keyed by (course, device): the bound device is the only
//! learner identity the service knows.

use access::domain::value_object::{CourseId, DeviceId};

use crate::domain::progression::CourseSession;
use crate::error::LearningResult;

/// Course progress repository trait
#[trait_variant::make(ProgressRepository: Send)]
pub trait LocalProgressRepository {
    /// Load the session, if one was saved
    async fn load(
        &self,
        course_id: &CourseId,
        device_id: &DeviceId,
    ) -> LearningResult<Option<CourseSession>>;

    /// Apply `apply` to the stored session (or `fresh` when none is stored)
    /// and store the result, atomically per key. An error from `apply`
    /// leaves the stored session untouched.
    async fn update<F, T>(
        &self,
        course_id: &CourseId,
        device_id: &DeviceId,
        fresh: CourseSession,
        apply: F,
    ) -> LearningResult<T>
    where
        F: FnOnce(&mut CourseSession) -> LearningResult<T> + Send,
        T: Send;

    /// Forget the session. Returns whether one existed.
    async fn reset(&self, course_id: &CourseId, device_id: &DeviceId) -> LearningResult<bool>;
}

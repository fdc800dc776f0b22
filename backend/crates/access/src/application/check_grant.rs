//! Check Grant Use Case
//!
//! Reads the access grant cookie without touching storage.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AccessConfig;
use crate::domain::services::AccessGrant;
use crate::domain::value_object::CourseId;

pub struct CheckGrantUseCase {
    config: Arc<AccessConfig>,
}

impl CheckGrantUseCase {
    pub fn new(config: Arc<AccessConfig>) -> Self {
        Self { config }
    }

    /// The grant if `token` is authentic, unexpired and scoped to `course_id`
    pub fn execute(&self, token: Option<&str>, course_id: &CourseId) -> Option<AccessGrant> {
        let grant = AccessGrant::decode(&self.config.grant_secret, token?)?;
        grant
            .is_valid_for(course_id, Utc::now().timestamp_millis())
            .then_some(grant)
    }
}

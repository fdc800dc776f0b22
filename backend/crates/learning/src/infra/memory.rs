//! In-memory Progress Repository
//!
//! Progress survives page reloads for the lifetime of the process and is
//! lost on restart.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use access::domain::value_object::{CourseId, DeviceId};

use crate::domain::progression::CourseSession;
use crate::domain::repository::ProgressRepository;
use crate::error::{LearningError, LearningResult};

type ProgressKey = (CourseId, DeviceId);

/// In-memory progress store; clones share state
#[derive(Clone, Default)]
pub struct InMemoryProgressRepository {
    sessions: Arc<RwLock<HashMap<ProgressKey, CourseSession>>>,
}

impl InMemoryProgressRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> LearningResult<RwLockReadGuard<'_, HashMap<ProgressKey, CourseSession>>> {
        self.sessions
            .read()
            .map_err(|_| LearningError::Internal("progress store lock poisoned".to_string()))
    }

    fn write(&self) -> LearningResult<RwLockWriteGuard<'_, HashMap<ProgressKey, CourseSession>>> {
        self.sessions
            .write()
            .map_err(|_| LearningError::Internal("progress store lock poisoned".to_string()))
    }
}

impl ProgressRepository for InMemoryProgressRepository {
    async fn load(
        &self,
        course_id: &CourseId,
        device_id: &DeviceId,
    ) -> LearningResult<Option<CourseSession>> {
        let key = (course_id.clone(), device_id.clone());
        Ok(self.read()?.get(&key).cloned())
    }

    async fn update<F, T>(
        &self,
        course_id: &CourseId,
        device_id: &DeviceId,
        fresh: CourseSession,
        apply: F,
    ) -> LearningResult<T>
    where
        F: FnOnce(&mut CourseSession) -> LearningResult<T> + Send,
        T: Send,
    {
        let key = (course_id.clone(), device_id.clone());
        let mut sessions = self.write()?;

        let mut session = sessions.get(&key).cloned().unwrap_or(fresh);
        let output = apply(&mut session)?;
        sessions.insert(key, session);
        Ok(output)
    }

    async fn reset(&self, course_id: &CourseId, device_id: &DeviceId) -> LearningResult<bool> {
        let key = (course_id.clone(), device_id.clone());
        Ok(self.write()?.remove(&key).is_some())
    }
}

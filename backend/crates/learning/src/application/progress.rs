//! Progress Use Cases
//!
//! Apply one command to the learner's session, atomically per
//! (course, device).

use std::sync::Arc;

use access::domain::value_object::{CourseId, DeviceId};

use crate::domain::catalog::{Course, CourseCatalog};
use crate::domain::progression::{CourseSession, ProgressionError};
use crate::domain::quiz::{self, QuizScore};
use crate::domain::repository::ProgressRepository;
use crate::error::{LearningError, LearningResult};

/// Look up a course or fail with `CourseNotFound`
pub(crate) fn find_course<'a>(
    catalog: &'a CourseCatalog,
    course_id: &CourseId,
) -> LearningResult<&'a Course> {
    catalog
        .get(course_id)
        .ok_or_else(|| LearningError::CourseNotFound(course_id.clone()))
}

async fn load_or_start<R: ProgressRepository>(
    repo: &R,
    course: &Course,
    device_id: &DeviceId,
) -> LearningResult<CourseSession> {
    match repo.load(&course.id, device_id).await? {
        Some(session) => Ok(session),
        None => Ok(CourseSession::new(course.module_count())?),
    }
}

/// Session plus the score of the quiz just submitted, if any
#[derive(Debug, Clone)]
pub struct ProgressOutput {
    pub session: CourseSession,
    pub score: Option<QuizScore>,
}

/// One learner action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressCommand {
    CompleteModule(u32),
    SubmitModuleQuiz { module: u32, answers: Vec<usize> },
    Navigate(u32),
    StartFinalAssessment,
    SubmitFinalAssessment { answers: Vec<usize> },
}

// ============================================================================
// Get Progress
// ============================================================================

pub struct GetProgressUseCase<R>
where
    R: ProgressRepository,
{
    repo: Arc<R>,
    catalog: Arc<CourseCatalog>,
}

impl<R> GetProgressUseCase<R>
where
    R: ProgressRepository,
{
    pub fn new(repo: Arc<R>, catalog: Arc<CourseCatalog>) -> Self {
        Self { repo, catalog }
    }

    /// Current session; a fresh one (not yet stored) for new learners
    pub async fn execute(
        &self,
        course_id: &CourseId,
        device_id: &DeviceId,
    ) -> LearningResult<CourseSession> {
        let course = find_course(&self.catalog, course_id)?;
        load_or_start(&*self.repo, course, device_id).await
    }
}

// ============================================================================
// Advance Progress
// ============================================================================

pub struct AdvanceProgressUseCase<R>
where
    R: ProgressRepository,
{
    repo: Arc<R>,
    catalog: Arc<CourseCatalog>,
}

impl<R> AdvanceProgressUseCase<R>
where
    R: ProgressRepository,
{
    pub fn new(repo: Arc<R>, catalog: Arc<CourseCatalog>) -> Self {
        Self { repo, catalog }
    }

    pub async fn execute(
        &self,
        course_id: &CourseId,
        device_id: &DeviceId,
        command: ProgressCommand,
    ) -> LearningResult<ProgressOutput> {
        let course = find_course(&self.catalog, course_id)?;
        let fresh = CourseSession::new(course.module_count())?;
        let module_quiz = match &command {
            ProgressCommand::SubmitModuleQuiz { module, .. } => Some(*module),
            _ => None,
        };

        let output = self
            .repo
            .update(course_id, device_id, fresh, |session| {
                apply(course, session, command)
            })
            .await?;

        if let Some(score) = &output.score {
            match module_quiz {
                Some(module) => tracing::info!(
                    course_id = %course_id,
                    device = %device_id.tag(),
                    module,
                    correct = score.correct_count,
                    total = score.total,
                    passed = score.passed,
                    "Module quiz submitted"
                ),
                None => tracing::info!(
                    course_id = %course_id,
                    device = %device_id.tag(),
                    percentage = score.percentage,
                    passed = score.passed,
                    attempt = output.session.final_attempts(),
                    "Final assessment submitted"
                ),
            }
        }

        Ok(output)
    }
}

/// Run one command against the session, scoring quizzes first
fn apply(
    course: &Course,
    session: &mut CourseSession,
    command: ProgressCommand,
) -> LearningResult<ProgressOutput> {
    let score = match command {
        ProgressCommand::CompleteModule(module) => {
            session.complete_module(module)?;
            None
        }
        ProgressCommand::SubmitModuleQuiz { module, answers } => {
            let questions = &course
                .module(module)
                .ok_or(ProgressionError::ModuleOutOfRange {
                    module,
                    total: course.module_count(),
                })?
                .questions;
            let score = quiz::evaluate(questions, &answers)?;
            session.record_module_quiz(module, &score)?;
            Some(score)
        }
        ProgressCommand::Navigate(module) => {
            session.navigate(module)?;
            None
        }
        ProgressCommand::StartFinalAssessment => {
            session.start_final_assessment()?;
            None
        }
        ProgressCommand::SubmitFinalAssessment { answers } => {
            let score = quiz::evaluate(&course.final_assessment, &answers)?;
            session.record_final_assessment(&score)?;
            Some(score)
        }
    };

    Ok(ProgressOutput {
        session: session.clone(),
        score,
    })
}

// ============================================================================
// Reset Progress
// ============================================================================

pub struct ResetProgressUseCase<R>
where
    R: ProgressRepository,
{
    repo: Arc<R>,
    catalog: Arc<CourseCatalog>,
}

impl<R> ResetProgressUseCase<R>
where
    R: ProgressRepository,
{
    pub fn new(repo: Arc<R>, catalog: Arc<CourseCatalog>) -> Self {
        Self { repo, catalog }
    }

    /// Forget stored progress and return the fresh session
    pub async fn execute(
        &self,
        course_id: &CourseId,
        device_id: &DeviceId,
    ) -> LearningResult<CourseSession> {
        let course = find_course(&self.catalog, course_id)?;
        if self.repo.reset(course_id, device_id).await? {
            tracing::info!(course_id = %course_id, device = %device_id.tag(), "Progress reset");
        }
        Ok(CourseSession::new(course.module_count())?)
    }
}

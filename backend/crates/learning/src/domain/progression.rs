//! Module Progression Engine
//!
//! One `CourseSession` per (course, device). The session is a small state
//! machine over `Stage`:
//!
//! ```text
//! Module(n) --complete--> ModuleQuiz(n)
//! ModuleQuiz(n) --fail--> Module(n)
//! ModuleQuiz(n) --pass--> Module(n+1) | FinalAssessment (n = N)
//! FinalAssessment --fail--> Module(N)
//! FinalAssessment --pass--> Certificate (terminal)
//! ```
//!
//! Modules unlock in order; any unlocked module may be revisited.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::quiz::QuizScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "module", rename_all = "camelCase")]
pub enum Stage {
    Module(u32),
    ModuleQuiz(u32),
    FinalAssessment,
    Certificate,
}

impl Stage {
    /// Module the learner is currently on, if any
    pub fn module(&self) -> Option<u32> {
        match self {
            Stage::Module(n) | Stage::ModuleQuiz(n) => Some(*n),
            Stage::FinalAssessment | Stage::Certificate => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Module(n) => write!(f, "module {n}"),
            Stage::ModuleQuiz(n) => write!(f, "module {n} quiz"),
            Stage::FinalAssessment => f.write_str("final assessment"),
            Stage::Certificate => f.write_str("certificate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("Course has no modules")]
    EmptyCourse,

    #[error("Module {module} does not exist (course has {total} modules)")]
    ModuleOutOfRange { module: u32, total: u32 },

    #[error("Module {module} is locked until the previous module is completed")]
    ModuleLocked { module: u32 },

    #[error("Cannot {action} during the {stage}")]
    InvalidTransition { stage: Stage, action: &'static str },

    #[error("Final assessment unlocks after all modules are completed ({completed}/{total})")]
    FinalAssessmentLocked { completed: u32, total: u32 },

    #[error("Course already completed")]
    SessionCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSession {
    total_modules: u32,
    stage: Stage,
    completed: BTreeSet<u32>,
    final_attempts: u32,
    final_score: Option<QuizScore>,
}

impl CourseSession {
    pub fn new(total_modules: u32) -> Result<Self, ProgressionError> {
        if total_modules == 0 {
            return Err(ProgressionError::EmptyCourse);
        }
        Ok(Self {
            total_modules,
            stage: Stage::Module(1),
            completed: BTreeSet::new(),
            final_attempts: 0,
            final_score: None,
        })
    }

    pub fn total_modules(&self) -> u32 {
        self.total_modules
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn completed(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    pub fn final_attempts(&self) -> u32 {
        self.final_attempts
    }

    /// Score of the latest final assessment attempt
    pub fn final_score(&self) -> Option<&QuizScore> {
        self.final_score.as_ref()
    }

    pub fn highest_completed(&self) -> u32 {
        self.completed.last().copied().unwrap_or(0)
    }

    /// Highest module the learner may open
    pub fn unlocked_up_to(&self) -> u32 {
        (self.highest_completed() + 1).min(self.total_modules)
    }

    pub fn is_unlocked(&self, module: u32) -> bool {
        (1..=self.unlocked_up_to()).contains(&module)
    }

    pub fn all_modules_completed(&self) -> bool {
        self.completed.len() as u32 == self.total_modules
    }

    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Certificate
    }

    fn ensure_active(&self) -> Result<(), ProgressionError> {
        if self.is_complete() {
            return Err(ProgressionError::SessionCompleted);
        }
        Ok(())
    }

    fn ensure_exists(&self, module: u32) -> Result<(), ProgressionError> {
        if module == 0 || module > self.total_modules {
            return Err(ProgressionError::ModuleOutOfRange {
                module,
                total: self.total_modules,
            });
        }
        Ok(())
    }

    fn ensure_stage(&self, expected: Stage, action: &'static str) -> Result<(), ProgressionError> {
        if self.stage != expected {
            return Err(ProgressionError::InvalidTransition {
                stage: self.stage,
                action,
            });
        }
        Ok(())
    }

    /// `Module(n)` -> `ModuleQuiz(n)`
    pub fn complete_module(&mut self, module: u32) -> Result<(), ProgressionError> {
        self.ensure_active()?;
        self.ensure_exists(module)?;
        self.ensure_stage(Stage::Module(module), "complete this module")?;

        self.stage = Stage::ModuleQuiz(module);
        Ok(())
    }

    /// Apply a scored module quiz. Only valid in `ModuleQuiz(n)`.
    pub fn record_module_quiz(
        &mut self,
        module: u32,
        score: &QuizScore,
    ) -> Result<(), ProgressionError> {
        self.ensure_active()?;
        self.ensure_exists(module)?;
        self.ensure_stage(Stage::ModuleQuiz(module), "submit this quiz")?;

        if !score.passed {
            self.stage = Stage::Module(module);
            return Ok(());
        }

        self.completed.insert(module);

        // Advancing only happens from the frontier; reviews stay put
        self.stage = if module < self.highest_completed() {
            Stage::Module(module)
        } else if module < self.total_modules {
            Stage::Module(module + 1)
        } else if self.all_modules_completed() {
            Stage::FinalAssessment
        } else {
            Stage::Module(module)
        };
        Ok(())
    }

    /// Move to any unlocked module
    pub fn navigate(&mut self, module: u32) -> Result<(), ProgressionError> {
        self.ensure_active()?;
        self.ensure_exists(module)?;
        if !self.is_unlocked(module) {
            return Err(ProgressionError::ModuleLocked { module });
        }

        self.stage = Stage::Module(module);
        Ok(())
    }

    /// Enter (or re-enter) the final assessment
    pub fn start_final_assessment(&mut self) -> Result<(), ProgressionError> {
        self.ensure_active()?;
        if !self.all_modules_completed() {
            return Err(ProgressionError::FinalAssessmentLocked {
                completed: self.completed.len() as u32,
                total: self.total_modules,
            });
        }

        self.stage = Stage::FinalAssessment;
        Ok(())
    }

    /// Apply a scored final assessment. Only valid in `FinalAssessment`.
    pub fn record_final_assessment(&mut self, score: &QuizScore) -> Result<(), ProgressionError> {
        self.ensure_active()?;
        self.ensure_stage(Stage::FinalAssessment, "submit the final assessment")?;

        self.final_attempts += 1;
        self.final_score = Some(*score);
        self.stage = if score.passed {
            Stage::Certificate
        } else {
            Stage::Module(self.total_modules)
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(passed: bool) -> QuizScore {
        QuizScore {
            correct_count: if passed { 2 } else { 1 },
            total: 2,
            percentage: if passed { 100 } else { 50 },
            required_correct: 2,
            passed,
        }
    }

    fn pass_module(session: &mut CourseSession, module: u32) {
        session.complete_module(module).unwrap();
        session.record_module_quiz(module, &score(true)).unwrap();
    }

    #[test]
    fn test_initial_state() {
        let session = CourseSession::new(3).unwrap();
        assert_eq!(session.stage(), Stage::Module(1));
        assert!(session.completed().is_empty());
        assert_eq!(session.unlocked_up_to(), 1);
        assert_eq!(CourseSession::new(0).unwrap_err(), ProgressionError::EmptyCourse);
    }

    #[test]
    fn test_full_progression() {
        let mut session = CourseSession::new(3).unwrap();

        pass_module(&mut session, 1);
        assert_eq!(session.stage(), Stage::Module(2));
        pass_module(&mut session, 2);
        assert_eq!(session.stage(), Stage::Module(3));
        pass_module(&mut session, 3);
        assert_eq!(session.stage(), Stage::FinalAssessment);
        assert!(session.all_modules_completed());

        session.record_final_assessment(&score(true)).unwrap();
        assert_eq!(session.stage(), Stage::Certificate);
        assert!(session.is_complete());
        assert_eq!(session.final_attempts(), 1);
    }

    #[test]
    fn test_failed_quiz_returns_to_module() {
        let mut session = CourseSession::new(6).unwrap();
        for module in 1..=5 {
            pass_module(&mut session, module);
        }

        session.complete_module(6).unwrap();
        session.record_module_quiz(6, &score(false)).unwrap();

        assert_eq!(session.stage(), Stage::Module(6));
        assert!(!session.completed().contains(&6));
        assert_eq!(session.completed().len(), 5);

        // Immediate retry
        session.complete_module(6).unwrap();
        assert_eq!(session.stage(), Stage::ModuleQuiz(6));
    }

    #[test]
    fn test_failed_final_returns_to_last_module() {
        let mut session = CourseSession::new(2).unwrap();
        pass_module(&mut session, 1);
        pass_module(&mut session, 2);

        session.record_final_assessment(&score(false)).unwrap();
        assert_eq!(session.stage(), Stage::Module(2));
        assert!(session.all_modules_completed());

        session.start_final_assessment().unwrap();
        session.record_final_assessment(&score(true)).unwrap();
        assert_eq!(session.stage(), Stage::Certificate);
        assert_eq!(session.final_attempts(), 2);
    }

    #[test]
    fn test_review_does_not_advance() {
        let mut session = CourseSession::new(4).unwrap();
        pass_module(&mut session, 1);
        pass_module(&mut session, 2);

        session.navigate(1).unwrap();
        pass_module(&mut session, 1);

        assert_eq!(session.stage(), Stage::Module(1));
        assert_eq!(session.completed().iter().copied().collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn test_navigation_is_gated() {
        let mut session = CourseSession::new(4).unwrap();
        pass_module(&mut session, 1);

        assert_eq!(
            session.navigate(3).unwrap_err(),
            ProgressionError::ModuleLocked { module: 3 }
        );
        assert_eq!(
            session.navigate(5).unwrap_err(),
            ProgressionError::ModuleOutOfRange {
                module: 5,
                total: 4
            }
        );

        session.navigate(1).unwrap();
        assert_eq!(session.stage(), Stage::Module(1));
        session.navigate(2).unwrap();
        assert_eq!(session.stage(), Stage::Module(2));
    }

    #[test]
    fn test_navigation_leaves_quiz() {
        let mut session = CourseSession::new(2).unwrap();
        session.complete_module(1).unwrap();
        session.navigate(1).unwrap();
        assert_eq!(session.stage(), Stage::Module(1));
    }

    #[test]
    fn test_invalid_transitions() {
        let mut session = CourseSession::new(3).unwrap();

        assert_eq!(
            session.complete_module(2).unwrap_err(),
            ProgressionError::InvalidTransition {
                stage: Stage::Module(1),
                action: "complete this module"
            }
        );
        assert!(matches!(
            session.record_module_quiz(1, &score(true)),
            Err(ProgressionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            session.record_final_assessment(&score(true)),
            Err(ProgressionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_final_assessment_locked() {
        let mut session = CourseSession::new(3).unwrap();
        pass_module(&mut session, 1);

        assert_eq!(
            session.start_final_assessment().unwrap_err(),
            ProgressionError::FinalAssessmentLocked {
                completed: 1,
                total: 3
            }
        );
    }

    #[test]
    fn test_certificate_is_terminal() {
        let mut session = CourseSession::new(1).unwrap();
        pass_module(&mut session, 1);
        session.record_final_assessment(&score(true)).unwrap();

        assert_eq!(session.navigate(1).unwrap_err(), ProgressionError::SessionCompleted);
        assert_eq!(
            session.start_final_assessment().unwrap_err(),
            ProgressionError::SessionCompleted
        );
        assert_eq!(
            session.record_final_assessment(&score(true)).unwrap_err(),
            ProgressionError::SessionCompleted
        );
        assert_eq!(session.stage(), Stage::Certificate);
    }

    #[test]
    fn test_completed_never_exceeds_total() {
        let mut session = CourseSession::new(2).unwrap();
        pass_module(&mut session, 1);
        session.navigate(1).unwrap();
        pass_module(&mut session, 1);
        session.navigate(2).unwrap();
        pass_module(&mut session, 2);

        assert_eq!(session.completed().len(), 2);
        assert_eq!(session.stage(), Stage::FinalAssessment);
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(
            serde_json::to_value(Stage::ModuleQuiz(3)).unwrap(),
            serde_json::json!({"kind": "moduleQuiz", "module": 3})
        );
        assert_eq!(
            serde_json::to_value(Stage::FinalAssessment).unwrap(),
            serde_json::json!({"kind": "finalAssessment"})
        );
    }
}

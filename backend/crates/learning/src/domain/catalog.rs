//! Course Catalog
//!
//! Courses are data: every course runs through the same progression engine.
//! A catalog is validated once, on load, so the rest of the crate can rely on
//! module ids being `1..=N` and on every quiz being answerable.
//!
//! `QuizQuestion` is deliberately not `Serialize`; correct answers never
//! leave the server.

use std::collections::HashSet;
use std::path::Path;

use access::domain::value_object::CourseId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../../catalog/courses.json");

/// Minimum number of options per question
pub const MIN_OPTIONS: usize = 2;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog contains no courses")]
    Empty,

    #[error("Duplicate course id: {0}")]
    DuplicateCourse(CourseId),

    #[error("Course {course_id}: {problem}")]
    InvalidCourse { course_id: CourseId, problem: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's minor unit (kobo, cents)
    pub amount_minor: u64,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`
    pub correct_option: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// One-based position within the course
    pub id: u32,
    pub title: String,
    pub content: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub modules: Vec<Module>,
    pub final_assessment: Vec<QuizQuestion>,
}

impl Course {
    pub fn module_count(&self) -> u32 {
        self.modules.len() as u32
    }

    /// Module by its one-based id
    pub fn module(&self, id: u32) -> Option<&Module> {
        let index = id.checked_sub(1)?;
        self.modules.get(index as usize)
    }

    fn invalid(&self, problem: impl Into<String>) -> CatalogError {
        CatalogError::InvalidCourse {
            course_id: self.id.clone(),
            problem: problem.into(),
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.title.trim().is_empty() {
            return Err(self.invalid("title is empty"));
        }
        if self.modules.is_empty() {
            return Err(self.invalid("course has no modules"));
        }

        for (index, module) in self.modules.iter().enumerate() {
            let expected = index as u32 + 1;
            if module.id != expected {
                return Err(self.invalid(format!(
                    "module ids must be 1..=N in order (expected {expected}, found {})",
                    module.id
                )));
            }
            self.validate_questions(&module.questions, &format!("module {expected}"))?;
        }

        self.validate_questions(&self.final_assessment, "final assessment")
    }

    fn validate_questions(&self, questions: &[QuizQuestion], label: &str) -> Result<(), CatalogError> {
        if questions.is_empty() {
            return Err(self.invalid(format!("{label} has no questions")));
        }

        for (index, question) in questions.iter().enumerate() {
            let number = index + 1;
            if question.options.len() < MIN_OPTIONS {
                return Err(self.invalid(format!(
                    "{label} question {number} needs at least {MIN_OPTIONS} options"
                )));
            }
            if question.correct_option >= question.options.len() {
                return Err(self.invalid(format!(
                    "{label} question {number} has no option {}",
                    question.correct_option
                )));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    courses: Vec<Course>,
}

/// Validated, immutable set of courses
#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn from_courses(courses: Vec<Course>) -> Result<Self, CatalogError> {
        if courses.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for course in &courses {
            if !seen.insert(course.id.clone()) {
                return Err(CatalogError::DuplicateCourse(course.id.clone()));
            }
            course.validate()?;
        }

        Ok(Self { courses })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_courses(file.courses)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| &course.id == id)
    }
}

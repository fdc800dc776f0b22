//! Data Transfer Objects
//!
//! Quiz questions are exposed as prompt and options only.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Course, Module, Price, QuizQuestion};
use crate::domain::certificate::CertificateArtifact;
use crate::domain::progression::{CourseSession, Stage};
use crate::domain::quiz::QuizScore;

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub id: u32,
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummaryResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub module_count: u32,
    pub modules: Vec<ModuleSummary>,
}

impl From<&Course> for CourseSummaryResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            title: course.title.clone(),
            description: course.description.clone(),
            price: course.price.clone(),
            module_count: course.module_count(),
            modules: course
                .modules
                .iter()
                .map(|m| ModuleSummary {
                    id: m.id,
                    title: m.title.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListResponse {
    pub courses: Vec<CourseSummaryResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub prompt: String,
    pub options: Vec<String>,
}

impl From<&QuizQuestion> for QuestionView {
    fn from(question: &QuizQuestion) -> Self {
        Self {
            prompt: question.prompt.clone(),
            options: question.options.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleContent {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub questions: Vec<QuestionView>,
}

impl From<&Module> for ModuleContent {
    fn from(module: &Module) -> Self {
        Self {
            id: module.id,
            title: module.title.clone(),
            content: module.content.clone(),
            questions: module.questions.iter().map(QuestionView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContentResponse {
    pub id: String,
    pub title: String,
    pub modules: Vec<ModuleContent>,
    pub final_assessment: Vec<QuestionView>,
}

impl From<&Course> for CourseContentResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            title: course.title.clone(),
            modules: course.modules.iter().map(ModuleContent::from).collect(),
            final_assessment: course.final_assessment.iter().map(QuestionView::from).collect(),
        }
    }
}

// ============================================================================
// Progress
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswersRequest {
    pub answers: Vec<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    pub module_id: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub course_id: String,
    pub total_modules: u32,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_module: Option<u32>,
    pub completed_modules: Vec<u32>,
    pub unlocked_up_to: u32,
    pub final_assessment_unlocked: bool,
    pub final_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<QuizScore>,
    pub completed: bool,
    /// Score of the quiz submitted with this request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<QuizScore>,
}

impl ProgressResponse {
    pub fn new(course_id: String, session: &CourseSession, score: Option<QuizScore>) -> Self {
        Self {
            course_id,
            total_modules: session.total_modules(),
            stage: session.stage(),
            current_module: session.stage().module(),
            completed_modules: session.completed().iter().copied().collect(),
            unlocked_up_to: session.unlocked_up_to(),
            final_assessment_unlocked: session.all_modules_completed(),
            final_attempts: session.final_attempts(),
            final_score: session.final_score().copied(),
            completed: session.is_complete(),
            score,
        }
    }
}

// ============================================================================
// Certificates
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCertificateRequest {
    #[serde(default)]
    pub student_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub certificate: CertificateArtifact,
    pub signature: String,
    pub html: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCertificateRequest {
    pub certificate: CertificateArtifact,
    pub signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCertificateResponse {
    pub valid: bool,
}

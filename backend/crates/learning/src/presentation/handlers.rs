//! HTTP Handlers
//!
//! Content and progress handlers sit behind `require_course_access` and read
//! the authorized course and device from `CourseAccess`.

use std::sync::Arc;

use access::domain::value_object::CourseId;
use access::presentation::middleware::CourseAccess;
use axum::Json;
use axum::extract::{Path, State};
use axum::Extension;

use crate::application::config::LearningConfig;
use crate::application::progress::find_course;
use crate::application::{
    AdvanceProgressUseCase, GetProgressUseCase, IssueCertificateUseCase, ProgressCommand,
    ResetProgressUseCase, VerifyCertificateUseCase,
};
use crate::domain::catalog::CourseCatalog;
use crate::domain::repository::ProgressRepository;
use crate::error::LearningResult;
use crate::presentation::dto::{
    CertificateResponse, CourseContentResponse, CourseListResponse, CourseSummaryResponse,
    IssueCertificateRequest, NavigateRequest, ProgressResponse, SubmitAnswersRequest,
    VerifyCertificateRequest, VerifyCertificateResponse,
};

/// Shared state for learning handlers
#[derive(Clone)]
pub struct LearningAppState<R>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    pub progress: Arc<R>,
    pub catalog: Arc<CourseCatalog>,
    pub config: Arc<LearningConfig>,
}

impl<R> LearningAppState<R>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    async fn advance(
        &self,
        access: &CourseAccess,
        command: ProgressCommand,
    ) -> LearningResult<Json<ProgressResponse>> {
        let use_case = AdvanceProgressUseCase::new(self.progress.clone(), self.catalog.clone());
        let output = use_case
            .execute(&access.course_id, &access.device_id, command)
            .await?;

        Ok(Json(ProgressResponse::new(
            access.course_id.to_string(),
            &output.session,
            output.score,
        )))
    }
}

// ============================================================================
// Public catalog
// ============================================================================

/// GET /api/courses
pub async fn list_courses<R>(State(state): State<LearningAppState<R>>) -> Json<CourseListResponse>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    Json(CourseListResponse {
        courses: state
            .catalog
            .courses()
            .iter()
            .map(CourseSummaryResponse::from)
            .collect(),
    })
}

/// GET /api/courses/{course_id}
pub async fn get_course<R>(
    State(state): State<LearningAppState<R>>,
    Path(course_id): Path<String>,
) -> LearningResult<Json<CourseSummaryResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    let course_id = CourseId::new(&course_id)?;
    let course = find_course(&state.catalog, &course_id)?;
    Ok(Json(CourseSummaryResponse::from(course)))
}

// ============================================================================
// Course content (gated)
// ============================================================================

/// GET /api/courses/{course_id}/content
pub async fn course_content<R>(
    State(state): State<LearningAppState<R>>,
    Extension(access): Extension<CourseAccess>,
) -> LearningResult<Json<CourseContentResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    let course = find_course(&state.catalog, &access.course_id)?;
    Ok(Json(CourseContentResponse::from(course)))
}

// ============================================================================
// Progress (gated)
// ============================================================================

/// GET /api/courses/{course_id}/progress
pub async fn get_progress<R>(
    State(state): State<LearningAppState<R>>,
    Extension(access): Extension<CourseAccess>,
) -> LearningResult<Json<ProgressResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    let use_case = GetProgressUseCase::new(state.progress.clone(), state.catalog.clone());
    let session = use_case
        .execute(&access.course_id, &access.device_id)
        .await?;

    Ok(Json(ProgressResponse::new(
        access.course_id.to_string(),
        &session,
        None,
    )))
}

/// DELETE /api/courses/{course_id}/progress
pub async fn reset_progress<R>(
    State(state): State<LearningAppState<R>>,
    Extension(access): Extension<CourseAccess>,
) -> LearningResult<Json<ProgressResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    let use_case = ResetProgressUseCase::new(state.progress.clone(), state.catalog.clone());
    let session = use_case
        .execute(&access.course_id, &access.device_id)
        .await?;

    Ok(Json(ProgressResponse::new(
        access.course_id.to_string(),
        &session,
        None,
    )))
}

/// POST /api/courses/{course_id}/progress/modules/{module_id}/complete
pub async fn complete_module<R>(
    State(state): State<LearningAppState<R>>,
    Extension(access): Extension<CourseAccess>,
    Path((_, module_id)): Path<(String, u32)>,
) -> LearningResult<Json<ProgressResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    state
        .advance(&access, ProgressCommand::CompleteModule(module_id))
        .await
}

/// POST /api/courses/{course_id}/progress/modules/{module_id}/quiz
pub async fn submit_module_quiz<R>(
    State(state): State<LearningAppState<R>>,
    Extension(access): Extension<CourseAccess>,
    Path((_, module_id)): Path<(String, u32)>,
    Json(req): Json<SubmitAnswersRequest>,
) -> LearningResult<Json<ProgressResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    let command = ProgressCommand::SubmitModuleQuiz {
        module: module_id,
        answers: req.answers,
    };
    state.advance(&access, command).await
}

/// POST /api/courses/{course_id}/progress/navigate
pub async fn navigate<R>(
    State(state): State<LearningAppState<R>>,
    Extension(access): Extension<CourseAccess>,
    Json(req): Json<NavigateRequest>,
) -> LearningResult<Json<ProgressResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    state
        .advance(&access, ProgressCommand::Navigate(req.module_id))
        .await
}

/// POST /api/courses/{course_id}/progress/final-assessment/start
pub async fn start_final_assessment<R>(
    State(state): State<LearningAppState<R>>,
    Extension(access): Extension<CourseAccess>,
) -> LearningResult<Json<ProgressResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    state
        .advance(&access, ProgressCommand::StartFinalAssessment)
        .await
}

/// POST /api/courses/{course_id}/progress/final-assessment
pub async fn submit_final_assessment<R>(
    State(state): State<LearningAppState<R>>,
    Extension(access): Extension<CourseAccess>,
    Json(req): Json<SubmitAnswersRequest>,
) -> LearningResult<Json<ProgressResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    let command = ProgressCommand::SubmitFinalAssessment {
        answers: req.answers,
    };
    state.advance(&access, command).await
}

// ============================================================================
// Certificates
// ============================================================================

/// POST /api/courses/{course_id}/certificate
pub async fn issue_certificate<R>(
    State(state): State<LearningAppState<R>>,
    Extension(access): Extension<CourseAccess>,
    Json(req): Json<IssueCertificateRequest>,
) -> LearningResult<Json<CertificateResponse>>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    let use_case = IssueCertificateUseCase::new(
        state.progress.clone(),
        state.catalog.clone(),
        state.config.clone(),
    );
    let output = use_case
        .execute(&access.course_id, &access.device_id, &req.student_name)
        .await?;

    Ok(Json(CertificateResponse {
        certificate: output.certificate,
        signature: output.signature,
        html: output.html,
    }))
}

/// POST /api/certificates/verify
pub async fn verify_certificate<R>(
    State(state): State<LearningAppState<R>>,
    Json(req): Json<VerifyCertificateRequest>,
) -> Json<VerifyCertificateResponse>
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
{
    let use_case = VerifyCertificateUseCase::new(state.config.clone());
    Json(VerifyCertificateResponse {
        valid: use_case.execute(&req.certificate, &req.signature),
    })
}

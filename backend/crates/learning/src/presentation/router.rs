//! Learning Router

use std::sync::Arc;

use access::application::config::AccessConfig;
use access::domain::repository::PinRepository;
use access::presentation::middleware::{CourseAccessState, require_course_access};
use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::config::LearningConfig;
use crate::domain::catalog::CourseCatalog;
use crate::domain::repository::ProgressRepository;
use crate::infra::memory::InMemoryProgressRepository;
use crate::presentation::handlers::{self, LearningAppState};

/// Create the Learning router with the in-memory progress store
///
/// `access_repo` and `access_config` must be the ones the access router
/// uses, so grants it issues are accepted here.
pub fn learning_router<A>(
    catalog: CourseCatalog,
    config: LearningConfig,
    access_repo: A,
    access_config: AccessConfig,
) -> Router
where
    A: PinRepository + Clone + Send + Sync + 'static,
{
    learning_router_generic(
        InMemoryProgressRepository::new(),
        catalog,
        config,
        access_repo,
        access_config,
    )
}

/// Create a generic Learning router for any progress store
pub fn learning_router_generic<R, A>(
    progress: R,
    catalog: CourseCatalog,
    config: LearningConfig,
    access_repo: A,
    access_config: AccessConfig,
) -> Router
where
    R: ProgressRepository + Clone + Send + Sync + 'static,
    A: PinRepository + Clone + Send + Sync + 'static,
{
    let state = LearningAppState {
        progress: Arc::new(progress),
        catalog: Arc::new(catalog),
        config: Arc::new(config),
    };
    let guard = CourseAccessState::new(access_repo, access_config);

    let gated = Router::new()
        .route(
            "/courses/{course_id}/content",
            get(handlers::course_content::<R>),
        )
        .route(
            "/courses/{course_id}/progress",
            get(handlers::get_progress::<R>).delete(handlers::reset_progress::<R>),
        )
        .route(
            "/courses/{course_id}/progress/modules/{module_id}/complete",
            post(handlers::complete_module::<R>),
        )
        .route(
            "/courses/{course_id}/progress/modules/{module_id}/quiz",
            post(handlers::submit_module_quiz::<R>),
        )
        .route(
            "/courses/{course_id}/progress/navigate",
            post(handlers::navigate::<R>),
        )
        .route(
            "/courses/{course_id}/progress/final-assessment/start",
            post(handlers::start_final_assessment::<R>),
        )
        .route(
            "/courses/{course_id}/progress/final-assessment",
            post(handlers::submit_final_assessment::<R>),
        )
        .route(
            "/courses/{course_id}/certificate",
            post(handlers::issue_certificate::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            guard,
            require_course_access::<A>,
        ));

    Router::new()
        .route("/courses", get(handlers::list_courses::<R>))
        .route("/courses/{course_id}", get(handlers::get_course::<R>))
        .route(
            "/certificates/verify",
            post(handlers::verify_certificate::<R>),
        )
        .merge(gated)
        .with_state(state)
}

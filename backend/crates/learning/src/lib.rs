//! Learning Backend Module
//!
//! Course catalog, quiz scoring, module progression and certificates.
//!
//! Clean Architecture structure:
//! - `domain/` - Catalog, quiz evaluator, progression engine, certificates
//! - `application/` - Use cases
//! - `infra/` - In-memory progress store
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every course-content route runs behind
//! `access::middleware::require_course_access`.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::LearningConfig;
pub use domain::catalog::{CatalogError, CourseCatalog};
pub use error::{LearningError, LearningResult};
pub use infra::memory::InMemoryProgressRepository;
pub use presentation::router::{learning_router, learning_router_generic};

#[cfg(test)]
mod tests;

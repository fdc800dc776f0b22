//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AccessAppState;
pub use middleware::{CourseAccess, CourseAccessState, require_course_access};
pub use router::access_router;

//! Presentation Layer
//!
//! HTTP handlers, DTOs and router. Course access is enforced by the access
//! crate's middleware.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::LearningAppState;
pub use router::{learning_router, learning_router_generic};

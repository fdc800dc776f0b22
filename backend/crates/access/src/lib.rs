//! Access (Course Access Gate) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - PIN entity, value objects, repository trait, access grant
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Security Model
//! - PINs are stored as SHA-256 digests salted with the course id
//! - The first successful redemption binds a PIN to one device
//! - The `course-access` cookie is a signed, expiring grant; presence alone
//!   authorizes nothing
//! - Content requests re-check the bearer device against the PIN store

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AccessConfig;
pub use error::{AccessError, AccessResult};
pub use infra::{memory::InMemoryAccessRepository, postgres::PgAccessRepository};
pub use presentation::router::access_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::services::AccessGrant;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::{PinRepository, RedeemOutcome};
    pub use crate::infra::memory::InMemoryAccessRepository as MemoryPinStore;
    pub use crate::infra::postgres::PgAccessRepository as PinStore;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

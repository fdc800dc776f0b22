//! Admin Gate Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Admin PIN value object, token claims
//! - `application/` - Authentication and token check use cases
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Security Model
//! - Two 6-digit PINs, stored as Argon2id hashes and checked in sequence
//! - Step 2 re-sends PIN 1, so no server state links the two steps
//! - Tokens are signed and expire after 4 hours; there is no revocation
//! - `POST /admin-auth` is rate limited per client IP

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AdminConfig;
pub use domain::AdminClaims;
pub use error::{AdminError, AdminResult};
pub use presentation::router::admin_router;

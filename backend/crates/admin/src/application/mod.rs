//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod check_token;
pub mod config;

// Re-exports
pub use authenticate::{AdminAuthUseCase, AdminToken};
pub use check_token::CheckAdminTokenUseCase;
pub use config::AdminConfig;

//! Application Layer
//!
//! Use cases and application services.

pub mod authorize_content;
pub mod check_grant;
pub mod config;
pub mod issue_pin;
pub mod validate_pin;

// Re-exports
pub use authorize_content::AuthorizeContentUseCase;
pub use check_grant::CheckGrantUseCase;
pub use config::AccessConfig;
pub use issue_pin::{IssuePinInput, IssuePinOutput, IssuePinUseCase};
pub use validate_pin::{ValidatePinInput, ValidatePinOutput, ValidatePinUseCase};

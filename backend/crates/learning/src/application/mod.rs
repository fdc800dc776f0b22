//! Application Layer
//!
//! Use cases and application services.

pub mod certificate;
pub mod config;
pub mod progress;

// Re-exports
pub use certificate::{IssueCertificateOutput, IssueCertificateUseCase, VerifyCertificateUseCase};
pub use config::LearningConfig;
pub use progress::{
    AdvanceProgressUseCase, GetProgressUseCase, ProgressCommand, ProgressOutput,
    ResetProgressUseCase,
};

//! Domain Layer
//!
//! Catalog, quiz scoring, progression and certificates. Everything here is
//! synchronous and free of I/O except the repository trait.

pub mod catalog;
pub mod certificate;
pub mod progression;
pub mod quiz;
pub mod repository;

pub use catalog::{CatalogError, Course, CourseCatalog, Module, Price, QuizQuestion};
pub use certificate::{CertificateArtifact, Grade, StudentName, StudentNameError};
pub use progression::{CourseSession, ProgressionError, Stage};
pub use quiz::{QuizError, QuizScore};
pub use repository::ProgressRepository;

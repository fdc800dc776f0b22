//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the access grant.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{CoursePin, RejectReason};
pub use repository::{PinRepository, RedeemOutcome};
pub use services::AccessGrant;
pub use value_object::{CourseId, DeviceId, PinCode, PinDigest};

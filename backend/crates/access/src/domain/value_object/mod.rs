//! Value Object Module

pub mod course_id;
pub mod device_id;
pub mod pin_code;
pub mod pin_digest;

pub use course_id::{CourseId, CourseIdError};
pub use device_id::{DeviceId, DeviceIdError};
pub use pin_code::{PIN_LENGTH, PinCode, PinCodeError};
pub use pin_digest::PinDigest;

//! Entity Module

pub mod course_pin;

pub use course_pin::{CoursePin, RejectReason};

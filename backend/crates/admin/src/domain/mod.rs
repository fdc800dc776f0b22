//! Domain Layer
//!
//! Admin PIN value object and token claims.

pub mod admin_pin;
pub mod claims;

pub use admin_pin::{ADMIN_PIN_LENGTH, AdminPin, AdminPinError};
pub use claims::AdminClaims;

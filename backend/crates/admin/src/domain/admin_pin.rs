//! Admin PIN Value Object
//!
//! Exactly six ASCII digits. Held as `ClearTextPin`, so the digits are
//! zeroized on drop and never appear in Debug output.

use std::fmt;

use platform::secret::{ClearTextPin, HashedPin, SecretHashError};
use thiserror::Error;

pub const ADMIN_PIN_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminPinError {
    #[error("PIN is required")]
    Empty,

    #[error("Admin PIN must be exactly 6 digits")]
    Malformed,
}

pub struct AdminPin(ClearTextPin);

impl AdminPin {
    pub fn new(raw: &str) -> Result<Self, AdminPinError> {
        if raw.is_empty() {
            return Err(AdminPinError::Empty);
        }
        ClearTextPin::new(raw, ADMIN_PIN_LENGTH)
            .map(Self)
            .map_err(|_| AdminPinError::Malformed)
    }

    /// Argon2id verification against a configured hash
    pub fn matches(&self, hash: &HashedPin) -> bool {
        hash.verify(&self.0)
    }

    pub fn hash(&self) -> Result<HashedPin, SecretHashError> {
        self.0.hash()
    }
}

impl fmt::Debug for AdminPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminPin([REDACTED])")
    }
}

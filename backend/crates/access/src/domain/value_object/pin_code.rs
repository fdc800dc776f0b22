//! PIN Code Value Object
//!
//! Five ASCII digits (`^\d{5}$`). The clear text is zeroized on drop and
//! never printed; only its digest is persisted.

use platform::secret::{ClearTextPin, PinFormatError};
use std::fmt;
use thiserror::Error;

pub const PIN_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinCodeError {
    #[error("PIN is required")]
    Empty,

    #[error("PIN must be exactly 5 digits")]
    Malformed,
}

impl From<PinFormatError> for PinCodeError {
    fn from(_: PinFormatError) -> Self {
        PinCodeError::Malformed
    }
}

pub struct PinCode(ClearTextPin);

impl PinCode {
    pub fn new(input: &str) -> Result<Self, PinCodeError> {
        if input.is_empty() {
            return Err(PinCodeError::Empty);
        }
        Ok(Self(ClearTextPin::new(input, PIN_LENGTH)?))
    }

    pub fn generate() -> Self {
        Self(ClearTextPin::generate(PIN_LENGTH))
    }

    /// Clear text digits
    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl fmt::Debug for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinCode([REDACTED])")
    }
}

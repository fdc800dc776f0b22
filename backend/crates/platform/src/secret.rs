//! PIN Secret Hashing and Verification
//!
//! Numeric secrets that must be stored at rest (the admin PINs) are kept as
//! Argon2id hashes in PHC string format.
//!
//! - Clear text is zeroized on drop and redacted in Debug output
//! - Verification goes through Argon2, which compares in constant time

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::{Rng, rngs::OsRng};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

/// Format violations for a clear text PIN
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinFormatError {
    #[error("PIN must be exactly {expected} digits (got {actual} characters)")]
    WrongLength { expected: usize, actual: usize },

    #[error("PIN must contain digits only")]
    NonDigit,
}

/// Hashing/verification errors
#[derive(Debug, Error)]
pub enum SecretHashError {
    #[error("PIN hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid PIN hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text PIN (Zeroized on drop)
// ============================================================================

/// Clear text numeric PIN.
///
/// Not `Clone`, so a copy cannot outlive the request by accident.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPin(String);

impl ClearTextPin {
    /// Parse a PIN of exactly `len` ASCII digits.
    pub fn new(raw: &str, len: usize) -> Result<Self, PinFormatError> {
        let actual = raw.chars().count();
        if actual != len {
            return Err(PinFormatError::WrongLength {
                expected: len,
                actual,
            });
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PinFormatError::NonDigit);
        }
        Ok(Self(raw.to_string()))
    }

    /// Uniformly random PIN of `len` digits
    pub fn generate(len: usize) -> Self {
        let digits = (0..len)
            .map(|_| char::from(b'0' + OsRng.gen_range(0..10u8)))
            .collect();
        Self(digits)
    }

    /// The digits, for hashing or a one-time display to the issuer
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with Argon2id and a fresh random salt.
    pub fn hash(&self) -> Result<HashedPin, SecretHashError> {
        let salt = SaltString::generate(OsRng);
        let hash = Argon2::default()
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| SecretHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPin {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPin").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Hashed PIN (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPin {
    hash: String,
}

impl HashedPin {
    /// Parse a PHC string (e.g. from an environment variable).
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, SecretHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| SecretHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    pub fn verify(&self, pin: &ClearTextPin) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(pin.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPin").field("hash", &"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_format() {
        assert!(ClearTextPin::new("123456", 6).is_ok());
        assert_eq!(
            ClearTextPin::new("12345", 6).unwrap_err(),
            PinFormatError::WrongLength {
                expected: 6,
                actual: 5
            }
        );
        assert_eq!(
            ClearTextPin::new("12a456", 6).unwrap_err(),
            PinFormatError::NonDigit
        );
        // Non-ASCII digits are rejected
        assert_eq!(
            ClearTextPin::new("١٢٣٤٥٦", 6).unwrap_err(),
            PinFormatError::NonDigit
        );
    }

    #[test]
    fn test_generate() {
        let pin = ClearTextPin::generate(5);
        assert_eq!(pin.expose().len(), 5);
        assert!(pin.expose().bytes().all(|b| b.is_ascii_digit()));
        assert!(ClearTextPin::new(pin.expose(), 5).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let pin = ClearTextPin::new("482913", 6).unwrap();
        let hashed = pin.hash().unwrap();

        assert!(hashed.verify(&pin));

        let wrong = ClearTextPin::new("482914", 6).unwrap();
        assert!(!hashed.verify(&wrong));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let pin = ClearTextPin::new("000111", 6).unwrap();
        let hashed = pin.hash().unwrap();

        let restored = HashedPin::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&pin));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPin::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let pin = ClearTextPin::new("987654", 6).unwrap();
        let debug_output = format!("{:?}", pin);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("987654"));
    }
}

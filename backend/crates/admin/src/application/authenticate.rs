//! Admin Authentication Use Case
//!
//! Two sequential PIN checks. Step 2 re-proves step 1, so the server keeps
//! no state between them.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AdminConfig;
use crate::domain::{AdminClaims, AdminPin};
use crate::error::{AdminError, AdminResult};

/// Token issued after step 2
pub struct AdminToken {
    pub token: String,
    pub claims: AdminClaims,
}

pub struct AdminAuthUseCase {
    config: Arc<AdminConfig>,
}

impl AdminAuthUseCase {
    pub fn new(config: Arc<AdminConfig>) -> Self {
        Self { config }
    }

    /// Step 1: check the first PIN
    pub fn verify_first(&self, pin: &str) -> AdminResult<()> {
        let pin = AdminPin::new(pin)?;
        if !pin.matches(&self.config.pin1) {
            return Err(AdminError::InvalidPin);
        }
        Ok(())
    }

    /// Step 2: check both PINs and issue a token
    pub fn verify_both(&self, pin1: &str, pin2: &str) -> AdminResult<AdminToken> {
        let pin1 = AdminPin::new(pin1)?;
        let pin2 = AdminPin::new(pin2)?;

        // Both hashes are always checked
        let first_ok = pin1.matches(&self.config.pin1);
        let second_ok = pin2.matches(&self.config.pin2);
        if !(first_ok && second_ok) {
            return Err(AdminError::InvalidPin);
        }

        let claims = AdminClaims::issue(Utc::now().timestamp_millis(), self.config.token_ttl_ms());
        let token = claims.encode(&self.config.token_secret);

        tracing::info!(
            token_id = %claims.token_id,
            expires_at_ms = claims.expires_at_ms,
            "Admin token issued"
        );

        Ok(AdminToken { token, claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn use_case() -> AdminAuthUseCase {
        AdminAuthUseCase::new(Arc::new(
            AdminConfig::development("135790", "246802").unwrap(),
        ))
    }

    #[test]
    fn test_step_one() {
        let use_case = use_case();
        assert!(use_case.verify_first("135790").is_ok());
        assert!(matches!(
            use_case.verify_first("246802"),
            Err(AdminError::InvalidPin)
        ));
        assert!(matches!(
            use_case.verify_first("12"),
            Err(AdminError::InvalidPinFormat(_))
        ));
    }

    #[test]
    fn test_step_two_issues_token() {
        let use_case = use_case();
        let issued = use_case.verify_both("135790", "246802").unwrap();

        let decoded = AdminClaims::decode(&use_case.config.token_secret, &issued.token).unwrap();
        assert_eq!(decoded, issued.claims);
        assert!(!decoded.is_expired(Utc::now().timestamp_millis()));
    }

    #[test]
    fn test_step_two_requires_both() {
        let use_case = use_case();
        assert!(matches!(
            use_case.verify_both("135790", "000000"),
            Err(AdminError::InvalidPin)
        ));
        assert!(matches!(
            use_case.verify_both("000000", "246802"),
            Err(AdminError::InvalidPin)
        ));
    }
}

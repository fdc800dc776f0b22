//! Check Admin Token Use Case

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AdminConfig;
use crate::domain::AdminClaims;
use crate::error::{AdminError, AdminResult};

pub struct CheckAdminTokenUseCase {
    config: Arc<AdminConfig>,
}

impl CheckAdminTokenUseCase {
    pub fn new(config: Arc<AdminConfig>) -> Self {
        Self { config }
    }

    /// Verify signature and expiry of a bearer token
    pub fn execute(&self, token: Option<&str>) -> AdminResult<AdminClaims> {
        let token = token.ok_or(AdminError::MissingToken)?;
        let claims = AdminClaims::decode(&self.config.token_secret, token)
            .ok_or(AdminError::InvalidToken)?;

        if claims.is_expired(Utc::now().timestamp_millis()) {
            return Err(AdminError::TokenExpired);
        }
        Ok(claims)
    }
}

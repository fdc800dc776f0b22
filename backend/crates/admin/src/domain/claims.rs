//! Admin Token Claims
//!
//! Token format: signed payload `"adm~{tokenId}~{expiresAtMs}"`. Nothing is
//! stored server side; the signature and expiry are the whole check.

use kernel::id::AdminTokenId;
use platform::crypto::{sign_payload, verify_payload};
use uuid::Uuid;

const TOKEN_PREFIX: &str = "adm";
const TOKEN_SEPARATOR: char = '~';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminClaims {
    pub token_id: AdminTokenId,
    pub expires_at_ms: i64,
}

impl AdminClaims {
    pub fn issue(now_ms: i64, ttl_ms: i64) -> Self {
        Self {
            token_id: AdminTokenId::new(),
            expires_at_ms: now_ms + ttl_ms,
        }
    }

    pub fn encode(&self, secret: &[u8; 32]) -> String {
        let payload = format!(
            "{TOKEN_PREFIX}{sep}{}{sep}{}",
            self.token_id.simple(),
            self.expires_at_ms,
            sep = TOKEN_SEPARATOR
        );
        sign_payload(secret, &payload)
    }

    /// Verify the signature and parse. Expiry is not checked here.
    pub fn decode(secret: &[u8; 32], token: &str) -> Option<Self> {
        let payload = verify_payload(secret, token)?;

        let mut parts = payload.split(TOKEN_SEPARATOR);
        if parts.next()? != TOKEN_PREFIX {
            return None;
        }
        let token_id = Uuid::try_parse(parts.next()?).ok()?;
        let expires_at_ms = parts.next()?.parse::<i64>().ok()?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            token_id: AdminTokenId::from_uuid(token_id),
            expires_at_ms,
        })
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

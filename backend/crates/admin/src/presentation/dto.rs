//! Data Transfer Objects

use serde::{Deserialize, Serialize};

/// POST /api/admin-auth
///
/// Step 1 sends `pin`; step 2 sends `pin1` and `pin2`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAuthRequest {
    pub step: u8,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub pin1: String,
    #[serde(default)]
    pub pin2: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStepResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTokenResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Expiry in epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionResponse {
    pub token_id: String,
    pub expires_at_ms: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePinRequest {
    pub course_id: String,
    /// Random 5-digit PIN when absent
    pub pin: Option<String>,
    pub usage_limit: Option<u32>,
    pub expires_at_ms: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePinResponse {
    pub pin_id: String,
    pub course_id: String,
    /// Shown once; only the digest is stored
    pub pin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
    pub created_at: String,
}

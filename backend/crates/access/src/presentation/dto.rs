//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

// ============================================================================
// PIN Validation
// ============================================================================

/// PIN validation request
///
/// Missing fields deserialize as empty and are rejected by validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePinRequest {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub device_id: String,
}

/// PIN validation response (same shape for success and rejection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePinResponse {
    pub valid: bool,
    pub message: String,
    pub course_id: String,
    pub device_linked: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires_at_ms: Option<i64>,
}

// ============================================================================
// Devices
// ============================================================================

/// Server-minted device identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub device_id: String,
}

// ============================================================================
// Access Status
// ============================================================================

/// Access grant status for one course
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessStatusResponse {
    pub course_id: String,
    pub granted: bool,
    pub expires_at_ms: Option<i64>,
}

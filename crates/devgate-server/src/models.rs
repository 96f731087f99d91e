//! API request and response models.

use serde::{Deserialize, Serialize};

/// Request body for POST /api/check.
///
/// Both fields are optional; absent fields default to the empty string
/// rather than erroring.
#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    /// High-entropy device model hint.
    #[serde(default)]
    pub model: Option<String>,
    /// Browser User-Agent string.
    #[serde(default)]
    pub ua: Option<String>,
}

/// Response body for POST /api/check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    /// Whether the visitor is blocked.
    pub blocked: bool,
    /// Configured redirect target, present regardless of `blocked`.
    pub redirect: String,
    /// Signed block-marker value for the client to persist; only present
    /// when `blocked` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Response body for GET /api/settings.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub blocked_models: Vec<String>,
    pub blocked_ua: Vec<String>,
    pub redirect_url: String,
}

/// Request body for PUT /api/settings.
///
/// Pattern fields are newline-delimited, one entry per line, matching the
/// admin form they back.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Session token for authentication.
    pub session_token: String,
    /// Newline-delimited model patterns.
    #[serde(default)]
    pub blocked_models: String,
    /// Newline-delimited User-Agent patterns.
    #[serde(default)]
    pub blocked_ua: String,
    /// Redirect URL; ignored unless shape-valid.
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Response body for PUT /api/settings.
#[derive(Debug, Serialize)]
pub struct UpdateSettingsResponse {
    pub success: bool,
    pub model_count: usize,
    pub ua_count: usize,
}

/// Request body for POST /api/auth/setup.
#[derive(Debug, Deserialize)]
pub struct AuthSetupRequest {
    /// Admin password to set.
    pub password: String,
}

/// Response body for POST /api/auth/setup.
#[derive(Debug, Serialize)]
pub struct AuthSetupResponse {
    pub success: bool,
}

/// Request body for POST /api/auth/verify.
#[derive(Debug, Deserialize)]
pub struct AuthVerifyRequest {
    /// Admin password.
    pub password: String,
}

/// Response body for POST /api/auth/verify.
#[derive(Debug, Serialize)]
pub struct AuthVerifyResponse {
    /// Whether authentication was successful.
    pub success: bool,
    /// Session token (only present on success).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// SETUP
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SetupTwoFactorResponse {
    pub success: bool,
    pub data: SetupTwoFactorData,
}

#[derive(Debug, Serialize)]
pub struct SetupTwoFactorData {
    pub secret: String,
    /// `data:image/png;base64,...`
    pub qr_code: String,
    pub otpauth: String,
}

// =============================================================================
// VERIFY
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyTwoFactorRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

// =============================================================================
// DISABLE
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct DisableTwoFactorRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

// =============================================================================
// STATUS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct TwoFactorStatusResponse {
    pub success: bool,
    pub data: TwoFactorStatusData,
}

#[derive(Debug, Serialize)]
pub struct TwoFactorStatusData {
    pub enabled: bool,
}

// =============================================================================
// SHARED
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

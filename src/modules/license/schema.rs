use serde::Serialize;

use crate::services::license::{LicenseInfo, LicenseStatusReport};

// =============================================================================
// INFO
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LicenseInfoResponse {
    pub success: bool,
    pub data: LicenseInfoData,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LicenseInfoData {
    Initialized(InitializedLicenseData),
    Uninitialized(UninitializedLicenseData),
}

#[derive(Debug, Serialize)]
pub struct InitializedLicenseData {
    pub license_key: String,
    #[serde(flatten)]
    pub info: LicenseInfo,
}

#[derive(Debug, Serialize)]
pub struct UninitializedLicenseData {
    pub valid: bool,
    pub license_key: String,
    pub message: &'static str,
}

// =============================================================================
// STATUS / REVALIDATE
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LicenseStatusResponse {
    pub success: bool,
    #[serde(flatten)]
    pub status: LicenseStatusReport,
}

#[derive(Debug, Serialize)]
pub struct RevalidateResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub status: LicenseStatusReport,
}

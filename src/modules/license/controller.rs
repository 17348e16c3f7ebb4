use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::error::ApiError;
use crate::modules::auth::AuthUser;
use crate::modules::license::schema::{
    InitializedLicenseData, LicenseInfoData, LicenseInfoResponse, LicenseStatusResponse,
    RevalidateResponse, UninitializedLicenseData,
};
use crate::AppState;

pub const NOT_INITIALIZED_MESSAGE: &str = "License not initialized";

pub async fn info(State(state): State<Arc<AppState>>) -> Json<LicenseInfoResponse> {
    // The configured key is echoed back even when it did not validate.
    // Existing clients read it from here; see DESIGN.md before changing.
    let license_key = state.license.license_key().to_string();

    let data = match state.license.info().await {
        Some(info) => LicenseInfoData::Initialized(InitializedLicenseData { license_key, info }),
        None => LicenseInfoData::Uninitialized(UninitializedLicenseData {
            valid: false,
            license_key,
            message: NOT_INITIALIZED_MESSAGE,
        }),
    };

    Json(LicenseInfoResponse {
        success: true,
        data,
    })
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<LicenseStatusResponse> {
    Json(LicenseStatusResponse {
        success: true,
        status: state.license.status().await,
    })
}

pub async fn revalidate(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> (StatusCode, Json<RevalidateResponse>) {
    match state.license.revalidate().await {
        Ok(status) => {
            tracing::info!(user_id = %auth.user_id, license_status = ?status.license_status, "license revalidated on request");
            (
                StatusCode::OK,
                Json(RevalidateResponse {
                    success: true,
                    message: "License revalidated".to_string(),
                    status,
                }),
            )
        }
        Err(e) => {
            tracing::warn!(user_id = %auth.user_id, error = %e, "license revalidation failed");
            let err = ApiError::from(e);
            // state is untouched on failure, so this is the last known status
            let status = state.license.status().await;
            (
                err.status_code(),
                Json(RevalidateResponse {
                    success: false,
                    message: err.public_message(),
                    status,
                }),
            )
        }
    }
}

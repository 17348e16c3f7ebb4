use axum::{extract::State, Json};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::modules::auth::{AuthUser, TwoFactorState, User};
use crate::modules::extract::ValidatedJson;
use crate::modules::two_factor::schema::{
    DisableTwoFactorRequest, MessageResponse, SetupTwoFactorData, SetupTwoFactorResponse,
    TwoFactorStatusData, TwoFactorStatusResponse, VerifyTwoFactorRequest,
};
use crate::services::hashing;
use crate::AppState;

/// Fresh copy of the caller's row; a deleted user counts as unauthenticated.
async fn load_user(state: &AppState, auth: &AuthUser) -> ApiResult<User> {
    state
        .users
        .find_by_id(&auth.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)
}

fn code_matches(state: &AppState, secret: &str, code: &str) -> ApiResult<bool> {
    state
        .totp
        .verify(secret, code)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

pub async fn setup(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<SetupTwoFactorResponse>> {
    let user = load_user(&state, &auth).await?;

    let enrollment = state
        .totp
        .enroll(&user.username)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    // replaces any unconfirmed secret and drops back to pending
    state
        .users
        .set_two_factor_secret(&user.id, &enrollment.secret)
        .await?;

    tracing::info!(user_id = %user.id, "2FA setup started");

    Ok(Json(SetupTwoFactorResponse {
        success: true,
        data: SetupTwoFactorData {
            secret: enrollment.secret,
            qr_code: enrollment.qr_code,
            otpauth: enrollment.otpauth_url,
        },
    }))
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<VerifyTwoFactorRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let user = load_user(&state, &auth).await?;

    let secret = user.two_factor_secret().ok_or(ApiError::NotSetUp)?;

    if !code_matches(&state, secret, &req.code)? {
        tracing::info!(user_id = %user.id, "2FA verification failed");
        return Err(ApiError::InvalidCode);
    }

    // a setup racing this request swaps the secret; only the checked one may be enabled
    state.users.enable_two_factor(&user.id, secret).await?;

    tracing::info!(user_id = %user.id, "2FA enabled");

    Ok(Json(MessageResponse::ok("2FA enabled successfully")))
}

pub async fn disable(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<DisableTwoFactorRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let user = load_user(&state, &auth).await?;

    let secret = match (user.two_factor_state(), user.two_factor_secret()) {
        (TwoFactorState::Enabled, Some(secret)) => secret,
        _ => return Err(ApiError::NotEnabled),
    };

    let password_ok = hashing::verify_password(&req.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !password_ok {
        tracing::info!(user_id = %user.id, "2FA disable rejected: wrong password");
        return Err(ApiError::InvalidPassword);
    }

    if !code_matches(&state, secret, &req.code)? {
        tracing::info!(user_id = %user.id, "2FA disable rejected: wrong code");
        return Err(ApiError::InvalidCode);
    }

    state.users.clear_two_factor(&user.id).await?;

    tracing::info!(user_id = %user.id, "2FA disabled");

    Ok(Json(MessageResponse::ok("2FA disabled successfully")))
}

pub async fn status(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<TwoFactorStatusResponse>> {
    let user = load_user(&state, &auth).await?;

    Ok(Json(TwoFactorStatusResponse {
        success: true,
        data: TwoFactorStatusData {
            enabled: user.two_factor_state() == TwoFactorState::Enabled,
        },
    }))
}

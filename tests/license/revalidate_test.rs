use axum::http::StatusCode;

use crate::common::{professional_grant, TestContext};
use postbox_api::services::license::LicenseTier;

#[tokio::test]
async fn revalidate_without_auth_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx.server.post("/api/license/revalidate").await;

    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn revalidate_picks_up_new_grant() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();

    let mut upgraded = professional_grant(365);
    upgraded.tier = LicenseTier::Enterprise;
    upgraded.max_subscribers = 1_000_000;
    ctx.validator.set_grant(upgraded);

    let response = ctx
        .server
        .post("/api/license/revalidate")
        .authorization_bearer(&user.token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "License revalidated");
    assert_eq!(body["valid"], true);
    assert_eq!(body["license_status"], "active");
    assert_eq!(body["read_only"], false);
    assert_eq!(body["days_until_expiry"], 365);

    let info: serde_json::Value = ctx.server.get("/api/license").await.json();
    assert_eq!(info["data"]["tier"], "enterprise");
    assert_eq!(info["data"]["max_subscribers"], 1_000_000);
}

#[tokio::test]
async fn revalidate_failure_returns_last_known_status() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    ctx.validator.fail_with("connection refused");

    let response = ctx
        .server
        .post("/api/license/revalidate")
        .authorization_bearer(&user.token)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("connection refused"));
    assert_eq!(body["valid"], true);
    assert_eq!(body["license_status"], "active");
    assert_eq!(body["read_only"], false);
    assert_eq!(body["days_until_expiry"], 180);
}

#[tokio::test]
async fn revalidate_failure_before_initialization_still_reports_status() {
    let ctx = TestContext::uninitialized();
    let user = ctx.create_user();
    ctx.validator.fail_with("timed out");

    let response = ctx
        .server
        .post("/api/license/revalidate")
        .authorization_bearer(&user.token)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["license_status"], "not_initialized");
    assert_eq!(body["read_only"], true);
}

#[tokio::test]
async fn revalidate_with_revoked_key_goes_read_only() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();

    let mut revoked = professional_grant(180);
    revoked.valid = false;
    revoked.message = "license revoked".to_string();
    ctx.validator.set_grant(revoked);

    let response = ctx
        .server
        .post("/api/license/revalidate")
        .authorization_bearer(&user.token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["valid"], false);
    assert_eq!(body["license_status"], "invalid");
    assert_eq!(body["read_only"], true);
    assert!(body["warning_message"]
        .as_str()
        .unwrap()
        .contains("license revoked"));
}

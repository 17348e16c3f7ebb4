use axum::http::StatusCode;
use serde_json::json;

use crate::common::{code_at_offset, current_code, wrong_code, TestContext, TestUser};

async fn start_setup(ctx: &TestContext, user: &TestUser) -> String {
    let body: serde_json::Value = ctx
        .server
        .post("/api/2fa/setup")
        .authorization_bearer(&user.token)
        .await
        .json();

    body["data"]["secret"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn verify_with_valid_code_enables_2fa() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    let secret = start_setup(&ctx, &user).await;

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .json(&json!({ "code": current_code(&secret) }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "2FA enabled successfully");
    assert!(ctx.users.get(&user.id).unwrap().two_factor_enabled);
    ctx.users.assert_two_factor_invariant();
}

#[tokio::test]
async fn verify_with_invalid_code_returns_bad_request() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    let secret = start_setup(&ctx, &user).await;

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .json(&json!({ "code": wrong_code(&secret) }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid 2FA code");
    assert!(!ctx.users.get(&user.id).unwrap().two_factor_enabled);
}

#[tokio::test]
async fn verify_without_setup_returns_bad_request() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .json(&json!({ "code": "123456" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "2FA is not set up");
    assert!(!ctx.users.get(&user.id).unwrap().two_factor_enabled);
}

#[tokio::test]
async fn verify_with_empty_code_returns_bad_request() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    start_setup(&ctx, &user).await;

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .json(&json!({ "code": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Code is required");
}

#[tokio::test]
async fn verify_with_missing_body_returns_bad_request() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    start_setup(&ctx, &user).await;

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request body");
}

#[tokio::test]
async fn verify_with_malformed_json_returns_bad_request() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .content_type("application/json")
        .text("{\"code\": ")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verify_without_auth_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .json(&json!({ "code": "123456" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verify_reads_the_latest_secret() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    start_setup(&ctx, &user).await;
    let latest = start_setup(&ctx, &user).await;

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .json(&json!({ "code": current_code(&latest) }))
        .await;

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn verify_does_not_enable_a_secret_replaced_mid_request() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    let confirmed = start_setup(&ctx, &user).await;

    // a second setup lands between the lookup and the enable
    let replacement = "JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXP".to_string();
    let swapped_in = replacement.clone();
    ctx.users.after_next_find(move |stored| {
        stored.two_factor_secret = Some(swapped_in);
        stored.two_factor_enabled = false;
    });

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .json(&json!({ "code": current_code(&confirmed) }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Invalid 2FA code");

    let stored = ctx.users.get(&user.id).unwrap();
    assert_eq!(stored.two_factor_secret(), Some(replacement.as_str()));
    assert!(!stored.two_factor_enabled);
    ctx.users.assert_two_factor_invariant();
}

#[tokio::test]
async fn verify_accepts_code_from_previous_step() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    let secret = start_setup(&ctx, &user).await;

    ctx.server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .json(&json!({ "code": code_at_offset(&secret, -30) }))
        .await
        .assert_status(StatusCode::OK);

    assert!(ctx.users.get(&user.id).unwrap().two_factor_enabled);
}

#[tokio::test]
async fn verify_rejects_code_three_steps_old() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    let secret = start_setup(&ctx, &user).await;

    let stale = code_at_offset(&secret, -90);
    let accepted = [-30, 0, 30].map(|offset| code_at_offset(&secret, offset));
    // 1 in ~330k chance the stale code collides with an accepted one
    if accepted.contains(&stale) {
        return;
    }

    ctx.server
        .post("/api/2fa/verify")
        .authorization_bearer(&user.token)
        .json(&json!({ "code": stale }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(!ctx.users.get(&user.id).unwrap().two_factor_enabled);
}

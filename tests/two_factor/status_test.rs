use axum::http::StatusCode;

use crate::common::{enable_two_factor, TestContext};

#[tokio::test]
async fn status_for_fresh_user_is_disabled() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();

    let response = ctx
        .server
        .get("/api/2fa/status")
        .authorization_bearer(&user.token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["enabled"], false);
}

#[tokio::test]
async fn status_while_pending_is_disabled() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();

    ctx.server
        .post("/api/2fa/setup")
        .authorization_bearer(&user.token)
        .await
        .assert_status_ok();

    let body: serde_json::Value = ctx
        .server
        .get("/api/2fa/status")
        .authorization_bearer(&user.token)
        .await
        .json();

    assert_eq!(body["data"]["enabled"], false);
}

#[tokio::test]
async fn status_reflects_store_changes_made_elsewhere() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user();
    enable_two_factor(&ctx, &user).await;

    let body: serde_json::Value = ctx
        .server
        .get("/api/2fa/status")
        .authorization_bearer(&user.token)
        .await
        .json();
    assert_eq!(body["data"]["enabled"], true);

    // e.g. an admin reset through another code path
    let mut stored = ctx.users.get(&user.id).unwrap();
    stored.two_factor_enabled = false;
    stored.two_factor_secret = None;
    ctx.users.insert(stored);

    let body: serde_json::Value = ctx
        .server
        .get("/api/2fa/status")
        .authorization_bearer(&user.token)
        .await
        .json();
    assert_eq!(body["data"]["enabled"], false);
}

#[tokio::test]
async fn status_without_auth_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/2fa/status").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

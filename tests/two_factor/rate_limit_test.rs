use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestContext;

#[tokio::test]
async fn one_user_exhausting_the_burst_does_not_block_others() {
    let ctx = TestContext::with_rate_limit_burst(3).await;
    let noisy = ctx.create_user();
    let quiet = ctx.create_user();

    for _ in 0..3 {
        ctx.server
            .post("/api/2fa/verify")
            .authorization_bearer(&noisy.token)
            .json(&json!({ "code": "000000" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let response = ctx
        .server
        .post("/api/2fa/verify")
        .authorization_bearer(&noisy.token)
        .json(&json!({ "code": "000000" }))
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);

    ctx.server
        .post("/api/2fa/setup")
        .authorization_bearer(&quiet.token)
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn many_users_within_their_own_budget_are_all_served() {
    let ctx = TestContext::with_rate_limit_burst(1).await;

    for _ in 0..25 {
        let user = ctx.create_user();
        ctx.server
            .post("/api/2fa/setup")
            .authorization_bearer(&user.token)
            .await
            .assert_status(StatusCode::OK);
    }
}

#[tokio::test]
async fn status_is_not_rate_limited() {
    let ctx = TestContext::with_rate_limit_burst(1).await;
    let user = ctx.create_user();

    for _ in 0..10 {
        ctx.server
            .get("/api/2fa/status")
            .authorization_bearer(&user.token)
            .await
            .assert_status(StatusCode::OK);
    }
}

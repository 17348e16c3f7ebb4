use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::services::jwt::JwtService;
use crate::services::rate_limit::{create_rate_limiter, RateLimitLayer};
use crate::AppState;
use super::controller;

pub fn two_factor_routes(rate_limit_burst: u32, jwt: JwtService) -> Router<Arc<AppState>> {
    // only the routes that generate or check codes are throttled
    let code_routes = Router::new()
        .route("/setup", post(controller::setup))
        .route("/verify", post(controller::verify))
        .route("/disable", post(controller::disable))
        .layer(RateLimitLayer::new(create_rate_limiter(rate_limit_burst), jwt));

    Router::new()
        .route("/status", get(controller::status))
        .merge(code_routes)
}

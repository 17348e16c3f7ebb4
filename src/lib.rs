pub mod config;
pub mod error;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use modules::auth::UserRepository;
use modules::license::license_routes;
use modules::two_factor::two_factor_routes;
use services::jwt::JwtService;
use services::license::LicenseManager;
use services::security::security_headers;
use services::totp::TotpService;

/// Everything a handler may touch. Built once in `main` (or a test) and
/// shared behind an `Arc`.
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub license: LicenseManager,
    pub jwt_service: JwtService,
    pub totp: TotpService,
}

pub fn create_app(state: AppState, two_factor_rate_limit_burst: u32) -> Router {
    let state = Arc::new(state);
    let jwt = state.jwt_service.clone();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/license", license_routes())
        .nest("/api/2fa", two_factor_routes(two_factor_rate_limit_burst, jwt))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Postbox API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

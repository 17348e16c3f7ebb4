use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn license_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(controller::info))
        .route("/status", get(controller::status))
        .route("/revalidate", post(controller::revalidate))
}

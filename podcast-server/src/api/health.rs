//! GET /health

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// Short git hash the binary was built from
    pub build: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        build: env!("GIT_HASH"),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check).fallback(super::not_found))
}

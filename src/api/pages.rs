//! Landing page and health check

use axum::response::{Html, Json};
use serde::Serialize;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Crate version
    pub version: String,
}

/// GET / - Static landing page
pub async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health - Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

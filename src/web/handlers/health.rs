//! Health check handler

use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;

use crate::web::{AppState, responses::ok};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: chrono::DateTime<Utc>,
    pub cache_entries: usize,
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    ok(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        cache_entries: state.catalog.store().len(),
    })
}

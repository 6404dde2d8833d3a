//! Effective configuration summary

use axum::{Json, extract::State};
use serde::Serialize;

use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub image_base_dir: String,
    pub thumbnail_dir: String,
    pub allowed_extensions: Vec<String>,
    /// The key itself is never exposed
    pub classifier_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub code: u16,
    pub config: ConfigSummary,
}

/// `GET /config`
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = &state.config;
    Json(ConfigResponse {
        code: 200,
        config: ConfigSummary {
            image_base_dir: config.storage.catalog_root.display().to_string(),
            thumbnail_dir: config.storage.thumbnail_dir.display().to_string(),
            allowed_extensions: state.catalog.classifier().extensions(),
            classifier_configured: config.classifier.is_configured(),
        },
    })
}

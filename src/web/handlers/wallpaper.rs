//! Desktop background handler

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::services::{resolve_image_url, run_blocking};
use crate::web::{AppState, responses::MessageResponse};

#[derive(Debug, Deserialize)]
pub struct SetWallpaperRequest {
    pub url: Option<String>,
}

/// `POST /set-wallpaper`
pub async fn set_wallpaper(
    State(state): State<AppState>,
    payload: Result<Json<SetWallpaperRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(request) =
        payload.map_err(|e| AppError::validation(format!("Invalid request body: {}", e.body_text())))?;

    let url = request
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::validation("Missing image url"))?;

    let root = state.catalog.root().to_path_buf();
    let path = run_blocking(move || resolve_image_url(&root, &url)).await?;

    let message = state.wallpaper_setter.set_wallpaper(&path).await?;
    Ok(Json(MessageResponse::ok(message)))
}

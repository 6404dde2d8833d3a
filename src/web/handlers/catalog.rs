//! Catalog HTTP handlers
//!
//! Every listing request runs a fresh incremental scan.

use axum::{Json, extract::State};
use tracing::info;

use crate::errors::AppResult;
use crate::services::run_blocking;
use crate::web::{
    AppState,
    extractors::CatalogQuery,
    responses::{CatalogResponse, CategoriesResponse, MessageResponse, PruneResponse},
};

/// `GET /api`
pub async fn list_images(
    State(state): State<AppState>,
    query: CatalogQuery,
) -> AppResult<Json<CatalogResponse>> {
    let count = query.count.unwrap_or(state.config.catalog.page_size);
    let catalog = state.catalog.clone();
    let page = run_blocking(move || Ok(catalog.query(&query.filter, query.start, count))).await?;
    Ok(Json(page.into()))
}

/// `GET /categories`
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<CategoriesResponse>> {
    let catalog = state.catalog.clone();
    let categories = run_blocking(move || Ok(catalog.categories())).await?;
    Ok(Json(categories.into()))
}

/// `GET /clear-cache`
pub async fn clear_cache(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    let catalog = state.catalog.clone();
    run_blocking(move || catalog.clear_cache()).await?;
    info!("Scan cache cleared on request");
    Ok(Json(MessageResponse::ok("Cache cleared")))
}

/// `GET /prune-cache`
pub async fn prune_cache(State(state): State<AppState>) -> AppResult<Json<PruneResponse>> {
    let catalog = state.catalog.clone();
    let removed = run_blocking(move || catalog.prune_cache()).await?;
    Ok(Json(PruneResponse {
        code: 200,
        message: format!("Removed {removed} stale cache entries"),
        removed,
    }))
}

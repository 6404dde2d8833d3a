//! Thumbnail handler
//!
//! Thumbnails are addressed by fingerprint, so a rendered thumbnail never
//! changes. Clients get a one-year `Cache-Control` plus a strong `ETag`, and
//! a matching `If-None-Match` is answered without rendering.

use axum::{
    extract::{Path, State},
    http::{
        HeaderMap, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH},
    },
    response::{IntoResponse, Response},
};

use crate::errors::{AppError, AppResult};
use crate::services::{ThumbnailRenderer, run_blocking, thumbnail::THUMBNAIL_CONTENT_TYPE};
use crate::web::AppState;

const THUMBNAIL_SUFFIX: &str = ".jpg";

/// `GET /thumbnails/{fingerprint}.jpg`
pub async fn serve_thumbnail(
    State(state): State<AppState>,
    Path(file): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let fingerprint = file
        .strip_suffix(THUMBNAIL_SUFFIX)
        .filter(|fingerprint| !fingerprint.is_empty())
        .ok_or_else(|| AppError::validation(format!("Unsupported thumbnail name: {file}")))?
        .to_string();

    let catalog = state.catalog.clone();
    let lookup = fingerprint.clone();
    let source = run_blocking(move || {
        catalog
            .resolve_fingerprint(&lookup)
            .ok_or_else(|| AppError::not_found("thumbnail", lookup.as_str()))
    })
    .await?;

    let etag = ThumbnailRenderer::etag_for(&fingerprint);
    if if_none_match(&headers, &etag) {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [
                (ETAG, etag),
                (CACHE_CONTROL, state.thumbnails.cache_control()),
            ],
        )
            .into_response());
    }

    let renderer = state.thumbnails.clone();
    let thumbnail = run_blocking(move || renderer.render(&source, &fingerprint)).await?;

    Ok((
        [
            (CONTENT_TYPE, THUMBNAIL_CONTENT_TYPE.to_string()),
            (CACHE_CONTROL, thumbnail.cache_control),
            (ETAG, thumbnail.etag),
        ],
        thumbnail.bytes,
    )
        .into_response())
}

/// Whether any validator in `If-None-Match` matches `etag`
fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|candidate| candidate.trim())
        .any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
}

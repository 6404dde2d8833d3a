//! Request extractors
//!
//! Query parameters are parsed here so that malformed input is rejected
//! with a 400 before any handler logic runs.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::CategoryFilter;

/// Raw `/api` query; numbers stay strings so the error message can name the field
#[derive(Debug, Default, Deserialize)]
struct RawCatalogQuery {
    cid: Option<String>,
    start: Option<String>,
    count: Option<String>,
}

/// Validated `/api` query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub filter: CategoryFilter,
    pub start: usize,
    /// `None` falls back to the configured page size
    pub count: Option<usize>,
}

impl CatalogQuery {
    fn from_raw(raw: RawCatalogQuery) -> Result<Self, AppError> {
        Ok(Self {
            filter: CategoryFilter::from_param(raw.cid.as_deref()),
            start: parse_non_negative("start", raw.start.as_deref())?.unwrap_or(0),
            count: parse_non_negative("count", raw.count.as_deref())?,
        })
    }
}

impl<S> FromRequestParts<S> for CatalogQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawCatalogQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid query: {}", e.body_text())))?;
        Self::from_raw(raw)
    }
}

fn parse_non_negative(name: &str, value: Option<&str>) -> Result<Option<usize>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<usize>().map(Some).map_err(|_| {
            AppError::validation(format!("{name} must be a non-negative integer, got {value:?}"))
        }),
    }
}

//! Response envelopes and error mapping
//!
//! Every JSON body carries a `code` field mirroring the HTTP status, which
//! is what the bundled front-end checks.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::AppError;
use crate::models::{CatalogPage, Category, ImageRecord};

/// `GET /api`
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub code: u16,
    pub data: Vec<ImageRecord>,
    pub total: usize,
    pub has_more: bool,
}

impl From<CatalogPage> for CatalogResponse {
    fn from(page: CatalogPage) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            data: page.items,
            total: page.total,
            has_more: page.has_more,
        }
    }
}

/// `GET /categories`
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub code: u16,
    pub categories: Vec<Category>,
}

impl From<Vec<Category>> for CategoriesResponse {
    fn from(categories: Vec<Category>) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            categories,
        }
    }
}

/// Plain acknowledgement, also the shape of every error body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub code: u16,
    pub message: String,
}

impl MessageResponse {
    pub fn ok<S: Into<String>>(message: S) -> Self {
        Self::with_status(StatusCode::OK, message)
    }

    pub fn with_status<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

/// `GET /prune-cache`
#[derive(Debug, Serialize)]
pub struct PruneResponse {
    pub code: u16,
    pub message: String,
    pub removed: usize,
}

/// Wrap a payload in a 200 JSON response
pub fn ok<T: Serialize>(payload: T) -> Response {
    (StatusCode::OK, Json(payload)).into_response()
}

/// Map an application error onto a status and a `{code, message}` body
pub fn handle_error(err: AppError) -> Response {
    let (status, message) = match &err {
        AppError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AppError::NotFound { resource, id } => {
            (StatusCode::NOT_FOUND, format!("{resource} not found: {id}"))
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };

    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }

    (status, Json(MessageResponse::with_status(status, message))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        handle_error(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case(AppError::validation("start must be a non-negative integer"), StatusCode::BAD_REQUEST)]
    #[case(AppError::not_found("thumbnail", "abc"), StatusCode::NOT_FOUND)]
    #[case(AppError::external_service("wallpaper", "exit 1"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(
        AppError::Scan(ScanError::CachePersist {
            path: PathBuf::from("cache.json"),
            message: "read-only".to_string(),
        }),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn test_status_mapping(#[case] err: AppError, #[case] expected: StatusCode) {
        assert_eq!(handle_error(err).status(), expected);
    }

    #[test]
    fn test_catalog_response_from_page() {
        let response = CatalogResponse::from(CatalogPage {
            items: Vec::new(),
            total: 45,
            has_more: false,
        });
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["code"], 200);
        assert_eq!(value["total"], 45);
        assert_eq!(value["has_more"], false);
        assert!(value["data"].as_array().unwrap().is_empty());
    }
}

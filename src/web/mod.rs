//! Web layer module
//!
//! This module provides the HTTP interface for the wallpaper catalog.
//! Handlers are thin and delegate to the service layer.
//!
//! # Architecture
//!
//! - **Handlers**: HTTP request handlers organized by domain
//! - **Responses**: `{code, ...}` envelopes and error mapping
//! - **Extractors**: Query parameter validation
//!
//! Raw images under `/images`, the `/static` assets and the index page are
//! served straight from disk by `tower-http`.

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    config::Config,
    services::{CatalogService, CommandWallpaperSetter, ThumbnailRenderer, WallpaperSetter},
};

pub mod extractors;
pub mod handlers;
pub mod responses;

// Re-export commonly used types
pub use extractors::CatalogQuery;
pub use responses::{MessageResponse, handle_error};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: CatalogService,
    pub thumbnails: ThumbnailRenderer,
    pub wallpaper_setter: Arc<dyn WallpaperSetter>,
}

impl AppState {
    /// Wire the services from configuration; loads the persisted scan cache
    pub fn new(config: Config) -> Self {
        let catalog = CatalogService::from_config(&config);
        let thumbnails = ThumbnailRenderer::from_config(&config.catalog);
        let wallpaper_setter: Arc<dyn WallpaperSetter> =
            Arc::new(CommandWallpaperSetter::from_config(&config.wallpaper));
        Self {
            config: Arc::new(config),
            catalog,
            thumbnails,
            wallpaper_setter,
        }
    }

    /// Replace the desktop background collaborator
    pub fn with_wallpaper_setter(mut self, setter: Arc<dyn WallpaperSetter>) -> Self {
        self.wallpaper_setter = setter;
        self
    }
}

/// Build the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let index_file = state.config.web.index_file.clone();
    let static_dir = state.config.web.static_dir.clone();
    let catalog_root = state.config.storage.catalog_root.clone();

    Router::new()
        // Catalog
        .route("/api", get(handlers::catalog::list_images))
        .route("/categories", get(handlers::catalog::list_categories))
        .route("/clear-cache", get(handlers::catalog::clear_cache))
        .route("/prune-cache", get(handlers::catalog::prune_cache))
        .route("/thumbnails/{file}", get(handlers::thumbnails::serve_thumbnail))
        .route("/set-wallpaper", post(handlers::wallpaper::set_wallpaper))
        // Operational endpoints
        .route("/config", get(handlers::config::get_config))
        .route("/health", get(handlers::health::health_check))
        // Files served from disk
        .route_service("/", ServeFile::new(index_file))
        .nest_service("/images", ServeDir::new(catalog_root))
        .nest_service("/static", ServeDir::new(static_dir))
        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> Result<Self> {
        let addr: SocketAddr =
            format!("{}:{}", state.config.web.host, state.config.web.port).parse()?;
        let app = create_router(state);
        Ok(Self { app, addr })
    }

    /// Start the web server; returns after Ctrl+C
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Listening on http://{}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router(dir: &std::path::Path) -> Router {
        let mut config = Config::default();
        config.storage.catalog_root = dir.join("wallpapers");
        config.storage.thumbnail_dir = dir.join("thumbnails");
        config.storage.cache_file = dir.join("cache.json");
        config.web.index_file = dir.join("index.html");
        config.web.static_dir = dir.join("static");
        config.ensure_directories().unwrap();
        create_router(AppState::new(config))
    }

    async fn status_of(app: &Router, method: &str, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_routes_are_mounted() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(dir.path());

        assert_eq!(status_of(&app, "GET", "/health").await, StatusCode::OK);
        assert_eq!(status_of(&app, "GET", "/api").await, StatusCode::OK);
        assert_eq!(status_of(&app, "GET", "/categories").await, StatusCode::OK);
        assert_eq!(status_of(&app, "GET", "/nowhere").await, StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(&app, "GET", "/set-wallpaper").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_web_server_address() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.cache_file = dir.path().join("cache.json");
        config.web.host = "127.0.0.1".to_string();
        config.web.port = 9090;

        let server = WebServer::new(AppState::new(config)).unwrap();
        assert_eq!(server.host(), "127.0.0.1");
        assert_eq!(server.port(), 9090);
    }
}

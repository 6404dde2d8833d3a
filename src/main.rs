use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Use the library instead of redeclaring modules
use wallpaper_catalog::{
    config::Config,
    web::{AppState, WebServer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "wallpaper-catalog")]
#[command(version)]
#[command(about = "A wallpaper library service with incremental indexing and on-demand thumbnails")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Directory of images to index (overrides config file)
    #[arg(short = 'r', long, value_name = "DIR")]
    catalog_root: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_tracing(cli: &Cli) {
    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("wallpaper_catalog={},tower_http=trace", cli.log_level)
    } else {
        format!("wallpaper_catalog={}", cli.log_level)
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    info!("Starting Wallpaper Catalog v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config);
    info!("Configuration resolved (file: {})", cli.config.display());

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(catalog_root) = cli.catalog_root {
        config.storage.catalog_root = catalog_root;
    }

    config
        .ensure_directories()
        .context("Failed to create catalog directories")?;
    info!(
        "Catalog root: {}, thumbnail dir: {}",
        config.storage.catalog_root.display(),
        config.storage.thumbnail_dir.display()
    );
    if !config.classifier.is_configured() {
        info!("Classifier API key not configured; the rename pipeline stays disabled");
    }

    let state = AppState::new(config);
    info!(
        "Scan cache loaded with {} entries",
        state.catalog.store().len()
    );

    let web_server = WebServer::new(state)?;
    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    info!("Wallpaper Catalog stopped");
    Ok(())
}

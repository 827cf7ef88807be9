//! HTTP server for modelshelfd

use crate::config::Config;
use crate::routes;
use crate::service::AssetService;
use crate::store::AssetStore;
use crate::thumbnail::{renderer_from_config, ThumbnailService};
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub assets: AssetService,
    pub thumbnails: ThumbnailService,
    pub public_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// `host:port` the thumbnail renderer fetches models from
    pub render_host: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(assets: AssetService, thumbnails: ThumbnailService, config: &Config) -> Self {
        Self {
            assets,
            thumbnails,
            public_dir: config.storage.public_dir.clone(),
            max_upload_bytes: config.upload.max_upload_bytes,
            render_host: render_host(config),
            start_time: Instant::now(),
        }
    }

    /// Wire the store, classifier and renderer the config describes
    pub fn from_config(config: &Config) -> Self {
        let assets = AssetService::new(AssetStore::new(&config.storage.models_dir));
        let thumbnails = ThumbnailService::new(
            &config.storage.thumbs_dir,
            renderer_from_config(&config.thumbnail),
        );
        Self::new(assets, thumbnails, config)
    }
}

/// The server's own address as seen from this machine. Wildcard binds map to
/// loopback; client supplied Host headers are never used.
pub fn render_host(config: &Config) -> String {
    match config.listen_addr() {
        Ok(mut addr) => {
            if addr.ip().is_unspecified() {
                let loopback = match addr.ip() {
                    IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                    IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
                };
                addr.set_ip(loopback);
            }
            addr.to_string()
        }
        Err(_) => format!("127.0.0.1:{}", config.server.port),
    }
}

/// Build the full application: API routes plus static models, thumbnails and front end
pub fn router(state: AppState) -> Router {
    let models_dir = state.assets.store().dir().to_path_buf();
    let thumbs_dir = state.thumbnails.dir().to_path_buf();
    let public_dir = state.public_dir.clone();
    let body_limit = state.max_upload_bytes;
    let state = Arc::new(state);

    Router::new()
        .merge(routes::asset_routes())
        .merge(routes::thumbnail_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .nest_service("/models", ServeDir::new(models_dir))
        .nest_service("/thumbs", ServeDir::new(thumbs_dir))
        .fallback_service(ServeDir::new(public_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until ctrl-c
pub async fn run(config: &Config) -> Result<()> {
    let state = AppState::from_config(config);
    state
        .assets
        .store()
        .ensure_dir()
        .await
        .with_context(|| {
            format!(
                "Failed to create models directory {}",
                config.storage.models_dir.display()
            )
        })?;

    let app = router(state);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down gracefully"),
        Err(e) => {
            warn!("Cannot listen for ctrl-c, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

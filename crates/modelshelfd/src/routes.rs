//! API routes for modelshelfd
//!
//! Paths and response shapes are what the viewer script expects:
//! /upload, /models-list, /models-metadata, /generate-thumb/:filename,
//! /remove/:filename.

use crate::server::AppState;
use axum::{
    extract::{
        multipart::MultipartError, rejection::PathRejection, Multipart, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
    Json, Router,
};
use modelshelf_common::{MetadataResponse, ShelfError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

type AppStateArc = Arc<AppState>;

/// Multipart field carrying the uploaded model
pub const UPLOAD_FIELD: &str = "model";

/// Error body shared by upload and thumbnail failures: `{ok:false, error}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

struct ApiError {
    status: StatusCode,
    error: ShelfError,
}

impl From<ShelfError> for ApiError {
    fn from(error: ShelfError) -> Self {
        let status = if error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self { status, error }
    }
}

impl From<MultipartError> for ApiError {
    /// Keeps the body parser's status, e.g. 413 for an oversized upload
    fn from(e: MultipartError) -> Self {
        Self {
            status: e.status(),
            error: ShelfError::Upload(e.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            ok: false,
            error: self.error.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

// ============================================================================
// Asset Routes
// ============================================================================

pub fn asset_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/upload", post(upload))
        .route("/models-list", get(models_list))
        .route("/models-metadata", get(models_metadata))
        .route("/remove/:filename", delete(remove))
}

async fn upload(
    State(state): State<AppStateArc>,
    mut multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let mut stored = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        // a plain text field under the same name is not a file upload
        let Some(original) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content = field.bytes().await.map_err(|e| {
            warn!("Upload of {} aborted: {}", original, e);
            e
        })?;

        let filename = state.assets.ingest_asset(&original, &content).await.map_err(|e| {
            error!("Upload of {} failed: {}", original, e);
            e
        })?;
        stored = Some(filename);
        break;
    }

    match stored {
        Some(filename) => info!("Upload stored as {}", filename),
        None => warn!("Upload without a '{}' file field, nothing stored", UPLOAD_FIELD),
    }
    Ok(Redirect::to("/"))
}

async fn models_list(State(state): State<AppStateArc>) -> Json<Vec<String>> {
    Json(state.assets.list_filenames().await)
}

async fn models_metadata(State(state): State<AppStateArc>) -> Json<MetadataResponse> {
    Json(state.assets.enumerate_assets().await)
}

/// Always 200: the viewer does not distinguish failed removals, not even
/// for a path that does not decode to a filename
async fn remove(
    State(state): State<AppStateArc>,
    filename: Result<Path<String>, PathRejection>,
) -> StatusCode {
    match filename {
        Ok(Path(filename)) => {
            state.assets.remove_asset(&filename).await;
        }
        Err(rejection) => warn!("Remove ignored, unusable path: {}", rejection.body_text()),
    }
    StatusCode::OK
}

// ============================================================================
// Thumbnail Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ThumbnailResponse {
    pub ok: bool,
    pub url: String,
}

pub fn thumbnail_routes() -> Router<AppStateArc> {
    Router::new().route("/generate-thumb/:filename", get(generate_thumb))
}

async fn generate_thumb(
    State(state): State<AppStateArc>,
    Path(filename): Path<String>,
) -> Response {
    let model_url = format!("http://{}/models/{}", state.render_host, filename);

    match state
        .thumbnails
        .thumbnail(state.assets.store(), &filename, &model_url)
        .await
    {
        Ok(url) => Json(ThumbnailResponse { ok: true, url }).into_response(),
        Err(e) => {
            error!("Thumbnail for {} failed: {}", filename, e);
            let body = ErrorResponse {
                ok: false,
                error: e.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

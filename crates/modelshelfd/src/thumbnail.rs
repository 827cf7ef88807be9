//! On-demand model thumbnails.
//!
//! A thumbnail is `<thumbs_dir>/<display stem>.png`. Once written it is
//! served forever; presence on disk is the whole cache. Misses are rendered
//! by taking a screenshot of a `<model-viewer>` page in a headless browser.

use crate::config::ThumbnailConfig;
use crate::store::AssetStore;
use async_trait::async_trait;
use modelshelf_common::{display_stem, is_safe_stored_name, ShelfError, ShelfResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info};

/// URL prefix the thumbnail directory is served under
pub const THUMBS_ROUTE: &str = "/thumbs";

/// Produces a PNG of the model at `model_url` into `out_path`.
#[async_trait]
pub trait ThumbnailRenderer: Send + Sync {
    async fn render(&self, model_url: &str, out_path: &Path) -> ShelfResult<()>;
}

/// Renderer used when thumbnail generation is switched off.
pub struct DisabledRenderer;

#[async_trait]
impl ThumbnailRenderer for DisabledRenderer {
    async fn render(&self, _model_url: &str, _out_path: &Path) -> ShelfResult<()> {
        Err(ShelfError::Render("thumbnail rendering disabled".to_string()))
    }
}

/// Screenshots a `<model-viewer>` page with a Chromium style browser.
pub struct HeadlessBrowserRenderer {
    browser: String,
    width: u32,
    height: u32,
    settle: Duration,
    timeout: Duration,
}

impl HeadlessBrowserRenderer {
    pub fn from_config(config: &ThumbnailConfig) -> Self {
        Self {
            browser: config.browser.clone(),
            width: config.width,
            height: config.height,
            settle: Duration::from_millis(config.settle_ms),
            timeout: Duration::from_secs(config.render_timeout_secs),
        }
    }

    fn page(&self, model_url: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><head>
<script type="module" src="https://unpkg.com/@google/model-viewer/dist/model-viewer.min.js"></script>
<style>html,body{{margin:0;padding:0}}</style>
</head><body>
<model-viewer id="mv" src="{url}" camera-controls shadow-intensity="1" exposure="1.0" style="width:{w}px;height:{h}px"></model-viewer>
</body></html>"#,
            url = model_url.replace('"', "%22"),
            w = self.width,
            h = self.height,
        )
    }
}

#[async_trait]
impl ThumbnailRenderer for HeadlessBrowserRenderer {
    async fn render(&self, model_url: &str, out_path: &Path) -> ShelfResult<()> {
        let mut page = tempfile::Builder::new()
            .prefix("modelshelf-thumb-")
            .suffix(".html")
            .tempfile()?;
        page.write_all(self.page(model_url).as_bytes())?;
        page.flush()?;

        debug!("Rendering {} with {}", model_url, self.browser);

        let child = Command::new(&self.browser)
            .arg("--headless")
            .arg("--no-sandbox")
            .arg("--hide-scrollbars")
            .arg("--enable-unsafe-swiftshader")
            .arg(format!("--window-size={},{}", self.width, self.height))
            .arg(format!("--virtual-time-budget={}", self.settle.as_millis()))
            .arg(format!("--screenshot={}", out_path.display()))
            .arg(format!("file://{}", page.path().display()))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ShelfError::Render(format!("cannot start {}: {}", self.browser, e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ShelfError::Render(format!("browser timed out after {:?}", self.timeout))
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Thumbnail render failed: {}", stderr.trim());
            return Err(ShelfError::Render(format!(
                "{} exited with {}: {}",
                self.browser,
                output.status,
                stderr.trim()
            )));
        }

        if !tokio::fs::try_exists(out_path).await.unwrap_or(false) {
            return Err(ShelfError::Render(format!(
                "{} produced no screenshot",
                self.browser
            )));
        }
        Ok(())
    }
}

/// Build the renderer the config asks for.
pub fn renderer_from_config(config: &ThumbnailConfig) -> Arc<dyn ThumbnailRenderer> {
    if config.enabled {
        Arc::new(HeadlessBrowserRenderer::from_config(config))
    } else {
        Arc::new(DisabledRenderer)
    }
}

pub struct ThumbnailService {
    dir: PathBuf,
    renderer: Arc<dyn ThumbnailRenderer>,
}

impl ThumbnailService {
    pub fn new(dir: impl Into<PathBuf>, renderer: Arc<dyn ThumbnailRenderer>) -> Self {
        Self {
            dir: dir.into(),
            renderer,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Return the thumbnail URL for `filename`, rendering it first if needed.
    pub async fn thumbnail(
        &self,
        store: &AssetStore,
        filename: &str,
        model_url: &str,
    ) -> ShelfResult<String> {
        if !is_safe_stored_name(filename) {
            return Err(ShelfError::InvalidName(filename.to_string()));
        }
        let stem = display_stem(filename);
        if stem.is_empty() {
            return Err(ShelfError::InvalidName(filename.to_string()));
        }

        let png = format!("{}.png", stem);
        let url = format!("{}/{}", THUMBS_ROUTE, png);
        let out_path = self.dir.join(&png);

        if tokio::fs::try_exists(&out_path).await.unwrap_or(false) {
            debug!("Thumbnail cache hit for {}", filename);
            return Ok(url);
        }

        if !store.contains(filename).await {
            return Err(ShelfError::NotFound(filename.to_string()));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        self.renderer.render(model_url, &out_path).await?;
        info!("Generated thumbnail {}", out_path.display());
        Ok(url)
    }
}

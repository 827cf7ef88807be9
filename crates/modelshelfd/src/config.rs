//! Configuration management for modelshelfd.
//!
//! Loads settings from /etc/modelshelf/config.toml or uses defaults.
//! Command line flags override whatever the file says.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/modelshelf/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/modelshelf/config.toml";

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, all interfaces by default so phones on the LAN can reach the viewer
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

/// On-disk locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Flat directory holding uploaded models
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Generated thumbnails, never evicted
    #[serde(default = "default_thumbs_dir")]
    pub thumbs_dir: PathBuf,

    /// Front end (index.html, script.js)
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_thumbs_dir() -> PathBuf {
    PathBuf::from("public/thumbs")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            thumbs_dir: default_thumbs_dir(),
            public_dir: default_public_dir(),
        }
    }
}

/// Upload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    256 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Headless thumbnail rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// When false only already generated thumbnails are served
    #[serde(default = "default_thumbnail_enabled")]
    pub enabled: bool,

    /// Chromium compatible browser binary
    #[serde(default = "default_browser")]
    pub browser: String,

    #[serde(default = "default_thumb_size")]
    pub width: u32,

    #[serde(default = "default_thumb_size")]
    pub height: u32,

    /// Time given to the viewer to load and draw the model
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Hard limit on one browser run
    #[serde(default = "default_render_timeout")]
    pub render_timeout_secs: u64,
}

fn default_thumbnail_enabled() -> bool {
    true
}

fn default_browser() -> String {
    "chromium".to_string()
}

fn default_thumb_size() -> u32 {
    512
}

fn default_settle_ms() -> u64 {
    1200
}

fn default_render_timeout() -> u64 {
    30
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            enabled: default_thumbnail_enabled(),
            browser: default_browser(),
            width: default_thumb_size(),
            height: default_thumb_size(),
            settle_ms: default_settle_ms(),
            render_timeout_secs: default_render_timeout(),
        }
    }
}

/// Values given on the command line, applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub models_dir: Option<PathBuf>,
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub thumbnail: ThumbnailConfig,
}

impl Config {
    /// Load config from file, or return defaults
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_PATH)
            .or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            })
    }

    /// Load config from specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(dir) = overrides.models_dir {
            self.storage.models_dir = dir;
        }
        self
    }

    /// Socket address the HTTP server listens on
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.bind, self.server.port);
        addr.parse()
            .with_context(|| format!("Invalid listen address {}", addr))
    }
}

//! Flat directory of uploaded models.
//!
//! Files are addressed by their stored name only. Anything in the directory
//! without the model extension is invisible here: never listed, never removed.

use modelshelf_common::{
    is_model_file, is_safe_stored_name, now_millis, sanitize_original_name, NameAllocator,
    ShelfError, ShelfResult, MODEL_EXTENSION,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Result of a remove request. Callers report success either way.
#[derive(Debug)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
    /// Name is not a visible model, nothing was touched
    Rejected,
    Failed(std::io::Error),
}

impl RemoveOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemoveOutcome::Removed)
    }
}

pub struct AssetStore {
    dir: PathBuf,
    names: NameAllocator,
    clock: fn() -> u64,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, now_millis)
    }

    /// Store with a fixed time source, for tests.
    pub fn with_clock(dir: impl Into<PathBuf>, clock: fn() -> u64) -> Self {
        Self {
            dir: dir.into(),
            names: NameAllocator::new(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory if missing. Idempotent.
    pub async fn ensure_dir(&self) -> ShelfResult<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write `content` under a freshly generated name and return that name.
    ///
    /// The bytes land under a hidden `.part` name first and are renamed into
    /// place, so a listing never sees a partial or failed upload.
    pub async fn ingest(&self, original_name: &str, content: &[u8]) -> ShelfResult<String> {
        let original = sanitize_original_name(original_name)?;
        if !is_model_file(&original) {
            return Err(ShelfError::InvalidName(format!(
                "{} (expected a {} file)",
                original, MODEL_EXTENSION
            )));
        }
        self.ensure_dir().await?;

        let filename = self.names.stored_name(&original, (self.clock)());
        let partial = self.dir.join(partial_name(&filename));
        if let Err(e) = write_then_rename(&partial, &self.dir.join(&filename), content).await {
            if let Err(cleanup) = fs::remove_file(&partial).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!("Cannot remove {}: {}", partial.display(), cleanup);
                }
            }
            return Err(e.into());
        }
        info!("Stored {} ({} bytes)", filename, content.len());
        Ok(filename)
    }

    /// Visible models, sorted by name. Errors if the directory can't be read.
    pub async fn try_list(&self) -> ShelfResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_model_file(&name) {
                continue;
            }
            if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Visible models, or nothing if the directory can't be read.
    pub async fn list(&self) -> Vec<String> {
        match self.try_list().await {
            Ok(names) => names,
            Err(e) => {
                warn!("Cannot read {}: {}", self.dir.display(), e);
                Vec::new()
            }
        }
    }

    /// True if `filename` is a visible model currently on disk.
    pub async fn contains(&self, filename: &str) -> bool {
        if !is_safe_stored_name(filename) {
            return false;
        }
        fs::metadata(self.dir.join(filename))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// On-disk path of a visible model.
    pub fn path_of(&self, filename: &str) -> ShelfResult<PathBuf> {
        if !is_safe_stored_name(filename) {
            return Err(ShelfError::InvalidName(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }

    pub async fn remove(&self, filename: &str) -> RemoveOutcome {
        let path = match self.path_of(filename) {
            Ok(path) => path,
            Err(_) => return RemoveOutcome::Rejected,
        };
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Removed {}", filename);
                RemoveOutcome::Removed
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Remove of missing {}", filename);
                RemoveOutcome::NotFound
            }
            Err(e) => RemoveOutcome::Failed(e),
        }
    }
}

/// In-progress name for `filename`. Never ends in the model extension.
fn partial_name(filename: &str) -> String {
    format!(".{}.part", filename)
}

async fn write_then_rename(partial: &Path, target: &Path, content: &[u8]) -> std::io::Result<()> {
    fs::write(partial, content).await?;
    fs::rename(partial, target).await
}

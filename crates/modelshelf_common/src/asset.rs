//! Stored asset naming and the records served to the viewer.
//!
//! A stored model is named `<unix_ms>-<original_filename>`. Everything the
//! viewer shows (display name, category, description) is derived from that
//! name on every query; nothing else is persisted.

use crate::classifier::{Category, Classifier};
use crate::error::{ShelfError, ShelfResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Only files with this suffix are visible to the service.
pub const MODEL_EXTENSION: &str = ".glb";

/// Message returned by the metadata listing when the store cannot be read.
pub const READ_FAILURE_MESSAGE: &str = "Error reading models directory";

/// True if `name` is a model the service lists and manages.
pub fn is_model_file(name: &str) -> bool {
    name.ends_with(MODEL_EXTENSION)
}

/// Reduce a client supplied filename to a single safe path component.
///
/// Browsers may send full paths (`C:\Users\me\cube.glb`); only the last
/// component is kept.
pub fn sanitize_original_name(raw: &str) -> ShelfResult<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return Err(ShelfError::InvalidName(raw.to_string()));
    }
    Ok(base.to_string())
}

/// True if `name` could have been produced by ingest and names a visible model.
/// Anything else is never touched by remove or thumbnail generation.
pub fn is_safe_stored_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && is_model_file(name)
}

/// Strip the `<digits>-` prefix and the model extension.
///
/// `1712345678901-damaged_helmet.glb` -> `damaged_helmet`
pub fn display_stem(filename: &str) -> &str {
    let digits = filename.bytes().take_while(u8::is_ascii_digit).count();
    let rest = if digits > 0 && filename[digits..].starts_with('-') {
        &filename[digits + 1..]
    } else {
        filename
    };
    rest.strip_suffix(MODEL_EXTENSION).unwrap_or(rest)
}

/// Display stem with its first letter capitalized.
pub fn display_name(filename: &str) -> String {
    let stem = display_stem(filename);
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One model as the viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: String,
    pub name: String,
    pub filename: String,
    pub description: String,
    pub category: Category,
    /// Always empty in listings, thumbnails are generated on request
    pub thumbnail_url: Option<String>,
}

impl AssetRecord {
    pub fn from_filename(filename: &str, classifier: &dyn Classifier) -> Self {
        let stem = display_stem(filename);
        Self {
            id: filename.to_string(),
            name: display_name(filename),
            filename: filename.to_string(),
            description: classifier.describe(stem),
            category: classifier.classify(stem),
            thumbnail_url: None,
        }
    }
}

/// Body of `GET /models-metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub success: bool,
    pub models: Vec<AssetRecord>,
    pub message: Option<String>,
}

impl MetadataResponse {
    pub fn ok(models: Vec<AssetRecord>) -> Self {
        Self {
            success: true,
            models,
            message: None,
        }
    }

    pub fn read_failure() -> Self {
        Self {
            success: false,
            models: Vec::new(),
            message: Some(READ_FAILURE_MESSAGE.to_string()),
        }
    }
}

/// Issues strictly increasing millisecond prefixes.
///
/// Two uploads landing in the same millisecond get `t` and `t + 1`, so the
/// prefix stays a timestamp in practice but never repeats within a process.
#[derive(Debug, Default)]
pub struct NameAllocator {
    last: AtomicU64,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next prefix given the current clock reading.
    pub fn issue(&self, now_ms: u64) -> u64 {
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let next = now_ms.max(current + 1);
            match self
                .last
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }

    /// Stored filename for `original_name` at `now_ms`.
    pub fn stored_name(&self, original_name: &str, now_ms: u64) -> String {
        format!("{}-{}", self.issue(now_ms), original_name)
    }
}

/// Wall clock in unix milliseconds.
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

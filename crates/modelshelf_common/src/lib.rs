//! Shared types for modelshelf components.
//!
//! Everything here is pure: naming rules for stored assets, the record shape
//! served to the viewer, the classifier tables and the error taxonomy. The
//! daemon owns all filesystem and network work.

pub mod asset;
pub mod classifier;
pub mod error;

pub use asset::{
    display_name, display_stem, is_model_file, is_safe_stored_name, now_millis,
    sanitize_original_name, AssetRecord, MetadataResponse, NameAllocator, MODEL_EXTENSION,
    READ_FAILURE_MESSAGE,
};
pub use classifier::{Category, Classifier, StaticClassifier, FALLBACK_DESCRIPTION};
pub use error::{ShelfError, ShelfResult};

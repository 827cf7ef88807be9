//! Error types for modelshelf.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Invalid asset name: {0}")]
    InvalidName(String),

    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Upload error: {0}")]
    Upload(String),
}

impl ShelfError {
    /// True when the caller sent something unusable, as opposed to a fault on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShelfError::InvalidName(_) | ShelfError::NotFound(_) | ShelfError::Upload(_)
        )
    }
}

pub type ShelfResult<T> = Result<T, ShelfError>;

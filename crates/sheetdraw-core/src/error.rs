//! Error types.

use thiserror::Error;

/// Scene document errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid scene document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Image pre-insertion pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("Asset unavailable: {reference}: {reason}")]
    AssetUnavailable { reference: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raster export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build scene image: {0}")]
    Build(String),
    #[error("Cannot allocate a {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

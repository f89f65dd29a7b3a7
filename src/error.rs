use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixgenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("A generation batch is already in flight")]
    Busy,
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Image request timed out after {0:?}")]
    ImageTimeout(Duration),
    #[error("Failed to load image: {0}")]
    ImageLoadFailure(String),
    #[error("Download failed: {0}")]
    DownloadFailure(String),
    #[error("Failed to fetch model list: {0}")]
    ModelListFetchFailure(String),
}

impl From<serde_json::Error> for PixgenError {
    fn from(e: serde_json::Error) -> Self {
        PixgenError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for PixgenError {
    fn from(e: std::io::Error) -> Self {
        PixgenError::StorageError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PixgenError>;

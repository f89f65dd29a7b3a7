use async_trait::async_trait;

use crate::{error::Result, models::ModelCatalog};

/// Loads a single generated image resource.
///
/// Resolves with the resource url once the image is fully available. The
/// caller owns the deadline; implementations should not apply their own.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<String>;
}

/// Fetches the raw bytes of an image so it can be written to disk.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// Source of the advertised model list. Implementations fall back instead
/// of failing.
#[async_trait]
pub trait ModelSource: Send + Sync {
    async fn fetch_models(&self) -> ModelCatalog;
}

use crate::{
    error::{PixgenError, Result},
    models::GenerationParameters,
    pollinations::traits::{ImageFetcher, ImageLoader},
};
use async_trait::async_trait;
use reqwest::Client;

/// Build the generation url for one variant.
///
/// Prompt and model are percent-encoded; `nologo=true` suppresses the
/// vendor watermark.
pub fn image_url(base_url: &str, params: &GenerationParameters, seed: u64) -> String {
    format!(
        "{}/prompt/{}?model={}&width={}&height={}&seed={}&nologo=true",
        base_url.trim_end_matches('/'),
        urlencoding::encode(&params.prompt),
        urlencoding::encode(&params.model),
        params.width,
        params.height,
        seed
    )
}

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
}

impl ImageClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, params: &GenerationParameters, seed: u64) -> String {
        image_url(&self.base_url, params, seed)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PixgenError::RequestError(format!("image request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PixgenError::ResponseError(format!(
                "image endpoint returned {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PixgenError::ResponseError(format!("failed to read image body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageLoader for ImageClient {
    async fn load(&self, url: &str) -> Result<String> {
        let bytes = self
            .get_bytes(url)
            .await
            .map_err(|e| PixgenError::ImageLoadFailure(e.to_string()))?;

        if bytes.is_empty() {
            return Err(PixgenError::ImageLoadFailure("empty image body".into()));
        }

        log::debug!("Loaded {} bytes from {}", bytes.len(), url);
        Ok(url.to_string())
    }
}

#[async_trait]
impl ImageFetcher for ImageClient {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.get_bytes(url)
            .await
            .map_err(|e| PixgenError::DownloadFailure(e.to_string()))
    }
}

pub mod image_client;
pub mod model_client;
pub mod traits;

use crate::{
    config::GeneratorConfig,
    error::{PixgenError, Result},
};
use reqwest::Client;

pub use image_client::{image_url, ImageClient};
pub use model_client::{parse_model_list, ModelClient};
pub use traits::{ImageFetcher, ImageLoader, ModelSource};

const USER_AGENT: &str = concat!("pixgen/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct PollinationsClient {
    image_client: ImageClient,
    model_client: ModelClient,
}

impl PollinationsClient {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PixgenError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            image_client: ImageClient::new(client.clone(), config.base_url.clone()),
            model_client: ModelClient::new(
                client,
                config.models_endpoint(),
                config.default_model.clone(),
            ),
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn models(&self) -> &ModelClient {
        &self.model_client
    }
}

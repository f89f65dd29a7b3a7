use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://image.pollinations.ai";
pub const DEFAULT_MODEL: &str = "flux";
pub const DEFAULT_BATCH_SIZE: usize = 9;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub models_url: Option<String>,
    pub image_timeout: Duration,
    pub batch_size: usize,
    pub default_model: String,
    pub data_dir: PathBuf,
    pub download_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            models_url: None,
            image_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
            default_model: DEFAULT_MODEL.to_string(),
            data_dir: default_data_dir(),
            download_dir: PathBuf::from("."),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("PIXGEN_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = env::var("PIXGEN_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.image_timeout = Duration::from_secs(secs);
        }
        if let Ok(dir) = env::var("PIXGEN_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("PIXGEN_DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }
        if let Ok(model) = env::var("PIXGEN_DEFAULT_MODEL") {
            if !model.trim().is_empty() {
                config.default_model = model;
            }
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_models_url(mut self, models_url: impl Into<String>) -> Self {
        self.models_url = Some(models_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Model-list endpoint, `{base_url}/models` unless overridden.
    pub fn models_endpoint(&self) -> String {
        self.models_url
            .clone()
            .unwrap_or_else(|| format!("{}/models", self.base_url))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("pixgen"))
        .unwrap_or_else(|| PathBuf::from(".pixgen"))
}

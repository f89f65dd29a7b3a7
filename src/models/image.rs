use serde::{Deserialize, Serialize};

use crate::error::PixgenError;

/// Reason recorded on every variant that could not be fetched.
pub const LOAD_FAILURE_REASON: &str = "Failed to load image";

/// One variant of a batch. Failed variants keep their slot with `url: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub url: Option<String>,
    pub prompt: String,
    pub seed: u64,
    pub model: String,
    pub width: u32,
    pub height: u32,
    pub error: Option<String>,
}

impl GeneratedImage {
    pub fn is_loaded(&self) -> bool {
        self.url.is_some()
    }

    /// File name used when the image is saved locally.
    pub fn file_name(&self) -> String {
        format!("ai-image-{}.jpg", self.seed)
    }
}

/// A downloaded image kept in the favorites list. Always carries a url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteImage {
    pub id: String,
    pub url: String,
    pub prompt: String,
    pub seed: u64,
    pub model: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub error: Option<String>,
}

impl TryFrom<GeneratedImage> for FavoriteImage {
    type Error = PixgenError;

    fn try_from(image: GeneratedImage) -> Result<Self, Self::Error> {
        let url = image.url.ok_or_else(|| {
            PixgenError::InvalidParameters(format!("image {} has no url", image.id))
        })?;

        Ok(FavoriteImage {
            id: image.id,
            url,
            prompt: image.prompt,
            seed: image.seed,
            model: image.model,
            width: image.width,
            height: image.height,
            error: None,
        })
    }
}

/// Ordered results of one batch, index-aligned with `base_seed + offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub base_seed: u64,
    pub images: Vec<GeneratedImage>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.images.iter().filter(|image| image.is_loaded()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }
}

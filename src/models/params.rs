use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MODEL;
use crate::error::{PixgenError, Result};

pub const MIN_DIMENSION: u32 = 16;
pub const MAX_DIMENSION: u32 = 2048;
pub const SEED_RANGE: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub prompt: String,
    pub model: String,
    pub width: u32,
    pub height: u32,
    pub seed: u64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            model: DEFAULT_MODEL.to_string(),
            width: 1024,
            height: 1024,
            seed: random_seed(),
        }
    }
}

impl GenerationParameters {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.apply_preset(ratio);
        self
    }

    pub fn apply_preset(&mut self, ratio: AspectRatio) {
        let (width, height) = ratio.dimensions();
        self.width = width;
        self.height = height;
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.trim().is_empty()
    }

    /// Dimensions outside [16, 2048] are rejected rather than clamped.
    pub fn validate_dimensions(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(PixgenError::InvalidParameters(format!(
                    "{} must be between {} and {}, got {}",
                    name, MIN_DIMENSION, MAX_DIMENSION, value
                )));
            }
        }
        if self.model.trim().is_empty() {
            return Err(PixgenError::InvalidParameters("model must not be empty".into()));
        }
        Ok(())
    }
}

/// Draw a seed in `[0, 1_000_000_000)`.
pub fn random_seed() -> u64 {
    rand::random_range(0..SEED_RANGE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    Square,
    Widescreen,
    Standard,
    Photo,
}

impl AspectRatio {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1024, 1024),
            AspectRatio::Widescreen => (1920, 1080),
            AspectRatio::Standard => (1024, 768),
            AspectRatio::Photo => (1200, 800),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Standard => "4:3",
            AspectRatio::Photo => "3:2",
        }
    }

    pub fn all() -> [AspectRatio; 4] {
        [
            AspectRatio::Square,
            AspectRatio::Widescreen,
            AspectRatio::Standard,
            AspectRatio::Photo,
        ]
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = PixgenError;

    fn from_str(s: &str) -> Result<Self> {
        AspectRatio::all()
            .into_iter()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| PixgenError::InvalidParameters(format!("unknown aspect ratio: {}", s)))
    }
}

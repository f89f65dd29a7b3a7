use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MODEL;

pub const MODEL_LIST_WARNING: &str = "Failed to load models. Please try again later.";

/// Models advertised by the endpoint, or the single default when the list
/// could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    pub models: Vec<String>,
    pub warning: Option<String>,
}

impl ModelCatalog {
    pub fn advertised(models: Vec<String>) -> Self {
        if models.is_empty() {
            return Self::fallback(DEFAULT_MODEL);
        }
        Self {
            models,
            warning: None,
        }
    }

    pub fn fallback(default_model: &str) -> Self {
        Self {
            models: vec![default_model.to_string()],
            warning: Some(MODEL_LIST_WARNING.to_string()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            models: vec![DEFAULT_MODEL.to_string()],
            warning: None,
        }
    }
}

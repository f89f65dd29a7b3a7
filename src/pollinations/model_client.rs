use crate::{
    error::{PixgenError, Result},
    models::ModelCatalog,
    pollinations::traits::ModelSource,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

#[derive(Clone)]
pub struct ModelClient {
    client: Client,
    endpoint: String,
    default_model: String,
}

impl ModelClient {
    pub fn new(client: Client, endpoint: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            default_model: default_model.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn try_fetch_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| PixgenError::ModelListFetchFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PixgenError::ModelListFetchFailure(format!(
                "endpoint returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PixgenError::ModelListFetchFailure(e.to_string()))?;

        parse_model_list(&body)
    }
}

#[async_trait]
impl ModelSource for ModelClient {
    /// Any failure yields the single-default fallback catalog with a
    /// warning attached.
    async fn fetch_models(&self) -> ModelCatalog {
        match self.try_fetch_models().await {
            Ok(models) if !models.is_empty() => {
                log::info!("Loaded {} models from {}", models.len(), self.endpoint);
                ModelCatalog::advertised(models)
            }
            Ok(_) => {
                log::warn!(
                    "Model list from {} was empty, using '{}'",
                    self.endpoint,
                    self.default_model
                );
                ModelCatalog::fallback(&self.default_model)
            }
            Err(e) => {
                log::warn!("{}; falling back to '{}'", e, self.default_model);
                ModelCatalog::fallback(&self.default_model)
            }
        }
    }
}

/// Parse a JSON array of model identifiers. Object entries carrying a
/// `name` field are accepted as well.
pub fn parse_model_list(body: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| PixgenError::ModelListFetchFailure(format!("invalid JSON: {}", e)))?;

    let entries = value
        .as_array()
        .ok_or_else(|| PixgenError::ModelListFetchFailure("expected a JSON array".into()))?;

    let models = entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(name.clone()),
            Value::Object(map) => map.get("name").and_then(Value::as_str).map(String::from),
            _ => None,
        })
        .filter(|name| !name.trim().is_empty())
        .collect();

    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_array() {
        let models = parse_model_list(r#"["flux", "turbo", "kontext"]"#).unwrap();
        assert_eq!(models, vec!["flux", "turbo", "kontext"]);
    }

    #[test]
    fn test_parse_object_entries() {
        let models = parse_model_list(r#"[{"name": "flux"}, {"id": 3}, 12, "turbo"]"#).unwrap();
        assert_eq!(models, vec!["flux", "turbo"]);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse_model_list(r#"{"models": []}"#),
            Err(PixgenError::ModelListFetchFailure(_))
        ));
        assert!(parse_model_list("<html>").is_err());
    }
}

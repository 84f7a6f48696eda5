//! # Model Catalog
//!
//! Selectable inference models for claim audits. Ids are unique; one id is the
//! session default.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{ClientError, ClientResult};

/// Default audit model
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

/// One selectable inference model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider: provider.into(),
        }
    }
}

impl std::fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.provider)
    }
}

/// Ordered list of models with a designated default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<ModelInfo>,
    default_id: String,
}

impl ModelCatalog {
    /// Build a catalog, rejecting duplicate ids and a default that is not listed
    pub fn new(models: Vec<ModelInfo>, default_id: impl Into<String>) -> ClientResult<Self> {
        let default_id = default_id.into();

        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.id.as_str()) {
                return Err(ClientError::config_error(format!(
                    "Duplicate model id in catalog: {}",
                    model.id
                )));
            }
        }

        if !seen.contains(default_id.as_str()) {
            return Err(ClientError::config_error(format!(
                "Default model '{}' is not in the catalog",
                default_id
            )));
        }

        Ok(Self { models, default_id })
    }

    /// The models offered by the billing service's audit endpoint
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            models: vec![
                ModelInfo::new(DEFAULT_MODEL_ID, "Claude Sonnet 4", "Anthropic"),
                ModelInfo::new(
                    "us.anthropic.claude-3-7-sonnet-20250109-v1:0",
                    "Claude 3.7 Sonnet",
                    "Anthropic",
                ),
                ModelInfo::new(
                    "anthropic.claude-3-haiku-20240307-v1:0",
                    "Claude 3 Haiku",
                    "Anthropic",
                ),
                ModelInfo::new(
                    "us.meta.llama4-scout-17b-instruct-v1:0",
                    "Llama 4 Scout 17B Instruct",
                    "Meta",
                ),
                ModelInfo::new(
                    "us.meta.llama4-maverick-17b-instruct-v1:0",
                    "Llama 4 Maverick 17B Instruct",
                    "Meta",
                ),
            ],
            default_id: DEFAULT_MODEL_ID.to_string(),
        }
    }

    /// Same models with a different default
    pub fn with_default(self, default_id: &str) -> ClientResult<Self> {
        Self::new(self.models, default_id)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|model| model.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    #[must_use]
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    #[must_use]
    pub fn default_model(&self) -> Option<&ModelInfo> {
        self.find(&self.default_id)
    }

    #[must_use]
    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

//! # Audit Response Interpretation
//!
//! The audit endpoint answers with one of several shapes: the analysis text under
//! `analysis` or `audit_result`, and optional `details` naming the model that ran.
//! These functions apply a fixed precedence to each part of the response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::catalog::{ModelCatalog, ModelInfo};

/// Shown when a successful audit returns no analysis text
pub const EMPTY_ANALYSIS_TEXT: &str = "Audit completed, but no analysis text was returned.";

pub const UNKNOWN_MODEL_NAME: &str = "Unknown Model";

pub const UNKNOWN_MODEL_PROVIDER: &str = "Unknown Provider";

const RESPONSE_SAMPLE_CHARS: usize = 500;

/// Result of looking for analysis text in a successful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum AnalysisExtraction {
    /// Trimmed analysis text
    Found(String),
    /// The call succeeded but carried no usable text
    EmptyButSuccessful,
}

impl AnalysisExtraction {
    /// Text to display, with the fixed placeholder for empty results
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            AnalysisExtraction::Found(text) => text,
            AnalysisExtraction::EmptyButSuccessful => EMPTY_ANALYSIS_TEXT,
        }
    }

    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        matches!(self, AnalysisExtraction::EmptyButSuccessful)
    }
}

/// Non-blank trimmed string at `key`, if any
fn text_field<'a>(object: &'a Value, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// `analysis`, then `audit_result`, then empty
#[must_use]
pub fn extract_analysis(response: &Value) -> AnalysisExtraction {
    text_field(response, "analysis")
        .or_else(|| text_field(response, "audit_result"))
        .map(|text| AnalysisExtraction::Found(text.to_string()))
        .unwrap_or(AnalysisExtraction::EmptyButSuccessful)
}

/// Model that actually produced the response.
///
/// Id: `details.model_used`, else the requested id. Name and provider: `details`,
/// else the catalog entry for the resolved id, else the unknown placeholders.
#[must_use]
pub fn resolve_model(response: &Value, requested_model: &str, catalog: &ModelCatalog) -> ModelInfo {
    let details = response.get("details").filter(|d| d.is_object());
    let detail = |key: &str| details.and_then(|d| text_field(d, key));

    let id = detail("model_used").unwrap_or(requested_model).to_string();
    let listed = catalog.find(&id);

    let name = detail("model_name")
        .or_else(|| listed.map(|m| m.name.as_str()))
        .unwrap_or(UNKNOWN_MODEL_NAME)
        .to_string();
    let provider = detail("model_provider")
        .or_else(|| listed.map(|m| m.provider.as_str()))
        .unwrap_or(UNKNOWN_MODEL_PROVIDER)
        .to_string();

    ModelInfo { id, name, provider }
}

/// Shape summary of an audit response, collected when debug info is enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditDiagnostics {
    pub response_keys: Vec<String>,
    pub has_analysis: bool,
    pub has_audit_result: bool,
    pub analysis_length: usize,
    pub audit_result_length: usize,
    /// First 500 characters of the serialized response, then `...`
    pub response_sample: String,
}

impl AuditDiagnostics {
    #[must_use]
    pub fn from_response(response: &Value) -> Self {
        let response_keys = response
            .as_object()
            .map(|object| object.keys().cloned().collect())
            .unwrap_or_default();
        let length = |key: &str| {
            response
                .get(key)
                .and_then(Value::as_str)
                .map(|text| text.chars().count())
                .unwrap_or(0)
        };

        let mut response_sample: String = response
            .to_string()
            .chars()
            .take(RESPONSE_SAMPLE_CHARS)
            .collect();
        response_sample.push_str("...");

        Self {
            response_keys,
            has_analysis: length("analysis") > 0,
            has_audit_result: length("audit_result") > 0,
            analysis_length: length("analysis"),
            audit_result_length: length("audit_result"),
            response_sample,
        }
    }
}

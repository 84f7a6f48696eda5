//! # Client Configuration
//!
//! Deployment-mode detection, endpoint resolution and the file-backed client settings.
//!
//! The endpoint (base URL, default headers, diagnostics switch) is a pure function of
//! [`DeploymentSignals`]. It is resolved once at start-up and injected into the gateway;
//! nothing re-reads the environment per request.
//!
//! # Examples
//!
//! ```rust
//! use claims_audit::config::{DeploymentMode, DeploymentSignals, EndpointConfig};
//!
//! let signals = DeploymentSignals {
//!     production_build: false,
//!     hosting_domain: Some("d1234.cloudfront.net".to_string()),
//! };
//! assert_eq!(signals.mode(), DeploymentMode::Production);
//!
//! let endpoint = EndpointConfig::resolve(&signals, false, 30000).unwrap();
//! assert!(endpoint.base_url.as_str().starts_with("https://"));
//! ```

mod loader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::info;
use url::Url;

use crate::audit::catalog::{ModelCatalog, ModelInfo};
use crate::error::{ClientError, ClientResult};

/// Billing API served from the hosted Lambda function URL
pub const PRODUCTION_BASE_URL: &str =
    "https://phslqkfk47zphdmvbufwi3oiz40ugscg.lambda-url.us-east-1.on.aws/api";

/// Billing API served by a locally running backend
pub const DEVELOPMENT_BASE_URL: &str = "http://127.0.0.1:5001/api";

/// Hosting domains that identify a production deployment
pub const PRODUCTION_HOST_PATTERNS: &[&str] = &["cloudfront.net", "amazonaws.com"];

/// Default request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

static PROCESS_ENDPOINT: OnceLock<EndpointConfig> = OnceLock::new();

/// Production/development distinction driving base-URL selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Production,
    Development,
}

impl DeploymentMode {
    #[must_use]
    pub fn is_production(self) -> bool {
        matches!(self, DeploymentMode::Production)
    }

    /// Base URL for this mode, always under the `/api` prefix
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            DeploymentMode::Production => PRODUCTION_BASE_URL,
            DeploymentMode::Development => DEVELOPMENT_BASE_URL,
        }
    }
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentMode::Production => write!(f, "PRODUCTION"),
            DeploymentMode::Development => write!(f, "DEVELOPMENT"),
        }
    }
}

/// Inputs that decide the deployment mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentSignals {
    /// Build-time production flag (release build or explicit override)
    pub production_build: bool,
    /// Domain the client is hosted under, when known
    pub hosting_domain: Option<String>,
}

impl DeploymentSignals {
    /// Read the signals from the build profile and process environment
    ///
    /// - `CLAIMS_AUDIT_PRODUCTION=true` forces the production flag in debug builds
    /// - `CLAIMS_AUDIT_HOST_DOMAIN` supplies the hosting domain
    #[must_use]
    pub fn from_environment() -> Self {
        let forced = std::env::var("CLAIMS_AUDIT_PRODUCTION")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Self {
            production_build: !cfg!(debug_assertions) || forced,
            hosting_domain: std::env::var("CLAIMS_AUDIT_HOST_DOMAIN")
                .ok()
                .filter(|domain| !domain.trim().is_empty()),
        }
    }

    /// Whether the hosting domain matches a known production pattern
    #[must_use]
    pub fn hosted_in_production(&self) -> bool {
        self.hosting_domain.as_deref().is_some_and(|domain| {
            let domain = domain.to_ascii_lowercase();
            PRODUCTION_HOST_PATTERNS
                .iter()
                .any(|pattern| domain.contains(pattern))
        })
    }

    #[must_use]
    pub fn mode(&self) -> DeploymentMode {
        if self.production_build || self.hosted_in_production() {
            DeploymentMode::Production
        } else {
            DeploymentMode::Development
        }
    }
}

/// Diagnostics default: on for debug builds, or when `CLAIMS_AUDIT_DEBUG=true`
#[must_use]
pub fn diagnostics_from_environment() -> bool {
    cfg!(debug_assertions)
        || std::env::var("CLAIMS_AUDIT_DEBUG")
            .map(|value| parse_flag(&value))
            .unwrap_or(false)
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Resolved endpoint for the billing API; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Base URL including the `/api` prefix
    pub base_url: Url,
    /// Headers sent with every request
    pub default_headers: BTreeMap<String, String>,
    /// Mode the base URL was selected for
    pub mode: DeploymentMode,
    /// Log headers and payloads in addition to method and path
    pub diagnostics: bool,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl EndpointConfig {
    /// Resolve the endpoint from deployment signals
    pub fn resolve(
        signals: &DeploymentSignals,
        diagnostics: bool,
        timeout_ms: u64,
    ) -> ClientResult<Self> {
        let mode = signals.mode();
        Self::for_base_url(mode.base_url(), mode, diagnostics, timeout_ms)
    }

    /// Build an endpoint for an explicit base URL (tests, local stubs)
    pub fn for_base_url(
        base_url: &str,
        mode: DeploymentMode,
        diagnostics: bool,
        timeout_ms: u64,
    ) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ClientError::config_error(format!("Invalid base URL '{}': {}", base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::config_error(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let mut default_headers = BTreeMap::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        Ok(Self {
            base_url,
            default_headers,
            mode,
            diagnostics,
            timeout_ms,
        })
    }

    /// Endpoint for this process, resolved on first call and fixed afterwards.
    ///
    /// Later calls return the first resolution regardless of `settings`.
    pub fn process_default(settings: &GatewaySettings) -> ClientResult<&'static EndpointConfig> {
        if let Some(endpoint) = PROCESS_ENDPOINT.get() {
            return Ok(endpoint);
        }

        let signals = DeploymentSignals::from_environment();
        let diagnostics = settings
            .diagnostics
            .unwrap_or_else(diagnostics_from_environment);
        let resolved = Self::resolve(&signals, diagnostics, settings.timeout_ms)?;

        let endpoint = PROCESS_ENDPOINT.get_or_init(|| resolved);
        info!(
            environment = %endpoint.mode,
            base_url = %endpoint.base_url,
            diagnostics = endpoint.diagnostics,
            "Resolved billing API endpoint"
        );
        Ok(endpoint)
    }
}

/// Client configuration loaded from file and environment
///
/// ```rust
/// use claims_audit::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.gateway.timeout_ms, 30000);
/// assert!(!config.audit.show_debug_info);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub gateway: GatewaySettings,
    pub audit: AuditSettings,
}

/// Gateway settings that are not derived from the deployment mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Explicit diagnostics override; `None` defers to build mode and `CLAIMS_AUDIT_DEBUG`
    pub diagnostics: Option<bool>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            diagnostics: None,
        }
    }
}

/// Audit workflow settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    /// Model selected at session start; falls back to the catalog default
    pub default_model: Option<String>,
    /// Collect response diagnostics alongside each outcome
    pub show_debug_info: bool,
    /// Replacement model list; empty keeps the built-in catalog
    pub models: Vec<ModelInfo>,
}

impl AuditSettings {
    /// Build the model catalog these settings describe
    pub fn catalog(&self) -> ClientResult<ModelCatalog> {
        if self.models.is_empty() {
            let catalog = ModelCatalog::builtin();
            return match &self.default_model {
                Some(default_id) => catalog.with_default(default_id),
                None => Ok(catalog),
            };
        }

        let default_id = self
            .default_model
            .clone()
            .or_else(|| self.models.first().map(|m| m.id.clone()))
            .unwrap_or_default();
        ModelCatalog::new(self.models.clone(), default_id)
    }
}

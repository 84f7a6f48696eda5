//! # Claim Audit Orchestrator
//!
//! Runs one claim audit against the billing service: validates the claim id, sends the
//! selected model as the `model_id` query parameter, and turns the response into an
//! [`AuditOutcome`]. Stateless between calls; no retries and no automatic model fallback.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api_clients::paths::{claim_audit, ResourceId};
use crate::audit::catalog::{ModelCatalog, ModelInfo};
use crate::audit::extraction::{
    extract_analysis, resolve_model, AnalysisExtraction, AuditDiagnostics,
};
use crate::error::ClientError;
use crate::transport::{ApiTransport, QueryParams};

/// Shown when the claim id is missing
pub const MISSING_CLAIM_ID_MESSAGE: &str = "Please enter a Claim ID";

/// Shown when an audit fails without a service message
pub const AUDIT_FAILURE_MESSAGE: &str =
    "Failed to perform audit. Please check the Claim ID and try again.";

/// Query parameter carrying the model id
pub const MODEL_ID_PARAM: &str = "model_id";

/// Body keys that must never carry the model id
const MODEL_BODY_KEYS: [&str; 2] = ["model_id", "modelId"];

/// One audit to perform
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRequest {
    pub claim_id: ResourceId,
    pub model_id: String,
    /// Additional body fields, passed through except for any model id key
    pub extra_body: Map<String, Value>,
}

impl AuditRequest {
    /// Request with the default body `{"claim_id": <claim_id>}`
    pub fn new(claim_id: impl Into<ResourceId>, model_id: impl Into<String>) -> Self {
        let claim_id = claim_id.into();
        let mut extra_body = Map::new();
        extra_body.insert("claim_id".to_string(), claim_id.to_json());
        Self {
            claim_id,
            model_id: model_id.into(),
            extra_body,
        }
    }

    /// Replace the body fields
    #[must_use]
    pub fn with_body(mut self, extra_body: Map<String, Value>) -> Self {
        self.extra_body = extra_body;
        self
    }

    /// Body actually sent: caller fields minus the model id keys
    #[must_use]
    pub fn body(&self) -> Value {
        let mut body = self.extra_body.clone();
        for key in MODEL_BODY_KEYS {
            body.remove(key);
        }
        Value::Object(body)
    }
}

/// The UI-facing result of a successful audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub analysis: AnalysisExtraction,
    pub model: ModelInfo,
    /// Present only when debug info collection is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<AuditDiagnostics>,
}

impl AuditOutcome {
    /// Analysis text, or the placeholder for empty results
    #[must_use]
    pub fn analysis_text(&self) -> &str {
        self.analysis.text()
    }

    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.analysis.is_empty_result()
    }
}

/// Failure of an audit, carrying the message to show
#[derive(Debug, Error)]
pub enum AuditError {
    /// Input problem; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// The gateway call failed
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ClientError,
    },
}

impl AuditError {
    /// Message for the person who started the audit
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            AuditError::Validation(message) => message,
            AuditError::Failed { message, .. } => message,
        }
    }
}

impl From<ClientError> for AuditError {
    fn from(source: ClientError) -> Self {
        match source {
            ClientError::Validation(message) => AuditError::Validation(message),
            ClientError::Transport(ref envelope) => {
                let message = envelope
                    .service_message
                    .clone()
                    .unwrap_or_else(|| AUDIT_FAILURE_MESSAGE.to_string());
                AuditError::Failed { message, source }
            }
            other => AuditError::Failed {
                message: AUDIT_FAILURE_MESSAGE.to_string(),
                source: other,
            },
        }
    }
}

/// Audit workflow over any [`ApiTransport`]
///
/// # Examples
///
/// ```rust,no_run
/// use claims_audit::audit::{AuditOrchestrator, ModelCatalog};
/// use claims_audit::config::{DeploymentSignals, EndpointConfig};
/// use claims_audit::HttpGateway;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = EndpointConfig::resolve(&DeploymentSignals::default(), false, 30000)?;
/// let gateway = Arc::new(HttpGateway::new(endpoint)?);
/// let orchestrator = AuditOrchestrator::new(gateway, ModelCatalog::builtin());
///
/// let outcome = orchestrator
///     .run_audit("1042", "anthropic.claude-3-haiku-20240307-v1:0")
///     .await?;
/// println!("Model: {}", outcome.model);
/// println!("{}", outcome.analysis_text());
/// # Ok(())
/// # }
/// ```
pub struct AuditOrchestrator<T: ApiTransport + ?Sized> {
    transport: Arc<T>,
    catalog: ModelCatalog,
    show_debug_info: bool,
}

impl<T: ApiTransport + ?Sized> std::fmt::Debug for AuditOrchestrator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditOrchestrator")
            .field("default_model", &self.catalog.default_id())
            .field("models", &self.catalog.models().len())
            .field("show_debug_info", &self.show_debug_info)
            .finish()
    }
}

impl<T: ApiTransport + ?Sized> AuditOrchestrator<T> {
    pub fn new(transport: Arc<T>, catalog: ModelCatalog) -> Self {
        Self {
            transport,
            catalog,
            show_debug_info: false,
        }
    }

    /// Attach [`AuditDiagnostics`] to each outcome
    #[must_use]
    pub fn with_debug_info(mut self, enabled: bool) -> Self {
        self.show_debug_info = enabled;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Audit `claim_id` with `model_id` and the default body
    pub async fn run_audit(
        &self,
        claim_id: impl Into<ResourceId>,
        model_id: &str,
    ) -> Result<AuditOutcome, AuditError> {
        self.audit(AuditRequest::new(claim_id, model_id)).await
    }

    /// Perform one audit
    pub async fn audit(&self, request: AuditRequest) -> Result<AuditOutcome, AuditError> {
        if request.claim_id.is_blank() {
            return Err(AuditError::Validation(MISSING_CLAIM_ID_MESSAGE.to_string()));
        }

        let model_id = if request.model_id.trim().is_empty() {
            self.catalog.default_id().to_string()
        } else {
            request.model_id.clone()
        };

        if !self.catalog.contains(&model_id) {
            warn!(model_id = %model_id, "Auditing with a model outside the catalog");
        }

        let path = claim_audit(&request.claim_id);
        let body = request.body();
        let mut query = QueryParams::new();
        query.insert(MODEL_ID_PARAM.to_string(), model_id.clone());

        info!(
            claim_id = %request.claim_id,
            model_id = %model_id,
            "Requesting claim audit"
        );

        let response = match self.transport.create(&path, &body, &query).await {
            Ok(response) => response,
            Err(e) => {
                if self.show_debug_info {
                    debug!(
                        claim_id = %request.claim_id,
                        status = ?e.envelope().and_then(|env| env.http_status),
                        raw = ?e.envelope().map(|env| &env.raw),
                        "Claim audit failed"
                    );
                }
                return Err(AuditError::from(e));
            }
        };

        let analysis = extract_analysis(&response);
        let model = resolve_model(&response, &model_id, &self.catalog);
        let diagnostics = self
            .show_debug_info
            .then(|| AuditDiagnostics::from_response(&response));

        info!(
            claim_id = %request.claim_id,
            model_used = %model.id,
            empty_result = analysis.is_empty_result(),
            "Claim audit completed"
        );

        Ok(AuditOutcome {
            analysis,
            model,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_clients::paths::ApiPath;
    use crate::audit::extraction::{EMPTY_ANALYSIS_TEXT, UNKNOWN_MODEL_NAME};
    use crate::error::{ClientResult, ErrorEnvelope};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Mutex;

    const HAIKU: &str = "anthropic.claude-3-haiku-20240307-v1:0";

    type Reply = Box<dyn Fn() -> ClientResult<Value> + Send + Sync>;

    /// Answers every `create` with a canned reply and records what was sent
    struct StubTransport {
        reply: Reply,
        sent: Mutex<Vec<(String, Value, QueryParams)>>,
    }

    impl StubTransport {
        fn replying(reply: impl Fn() -> ClientResult<Value> + Send + Sync + 'static) -> Arc<Self> {
            Arc::new(Self {
                reply: Box::new(reply),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn ok(body: Value) -> Arc<Self> {
            Self::replying(move || Ok(body.clone()))
        }

        fn sent(&self) -> Vec<(String, Value, QueryParams)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiTransport for StubTransport {
        async fn read(&self, _path: &ApiPath, _query: &QueryParams) -> ClientResult<Value> {
            unreachable!("audits only create")
        }

        async fn create(
            &self,
            path: &ApiPath,
            body: &Value,
            query: &QueryParams,
        ) -> ClientResult<Value> {
            self.sent
                .lock()
                .unwrap()
                .push((path.to_string(), body.clone(), query.clone()));
            (self.reply)()
        }

        async fn replace(&self, _path: &ApiPath, _body: &Value) -> ClientResult<Value> {
            unreachable!("audits only create")
        }

        async fn remove(&self, _path: &ApiPath) -> ClientResult<Value> {
            unreachable!("audits only create")
        }
    }

    fn orchestrator(transport: Arc<StubTransport>) -> AuditOrchestrator<StubTransport> {
        AuditOrchestrator::new(transport, ModelCatalog::builtin())
    }

    #[tokio::test]
    async fn test_successful_audit() {
        let transport = StubTransport::ok(json!({"analysis": "  No issues found.  "}));
        let outcome = orchestrator(transport.clone())
            .run_audit(77, HAIKU)
            .await
            .unwrap();

        assert_eq!(outcome.analysis_text(), "No issues found.");
        assert!(!outcome.is_empty_result());
        assert_eq!(outcome.model.id, HAIKU);
        assert_eq!(outcome.model.name, "Claude 3 Haiku");
        assert!(outcome.diagnostics.is_none());

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "/claims/77/audit");
        assert_eq!(sent[0].1, json!({"claim_id": 77}));
        assert_eq!(sent[0].2.get(MODEL_ID_PARAM).map(String::as_str), Some(HAIKU));
    }

    #[tokio::test]
    async fn test_audit_result_fallback() {
        let transport = StubTransport::ok(json!({"audit_result": "Duplicate billing suspected."}));
        let outcome = orchestrator(transport).run_audit("12", HAIKU).await.unwrap();
        assert_eq!(outcome.analysis_text(), "Duplicate billing suspected.");
    }

    #[tokio::test]
    async fn test_empty_result_is_success() {
        let transport = StubTransport::ok(json!({"status": "done"}));
        let outcome = orchestrator(transport).run_audit("12", HAIKU).await.unwrap();
        assert!(outcome.is_empty_result());
        assert_eq!(outcome.analysis_text(), EMPTY_ANALYSIS_TEXT);
        assert_eq!(outcome.model.id, HAIKU);
    }

    #[tokio::test]
    async fn test_model_used_overrides_request() {
        let transport = StubTransport::ok(json!({
            "analysis": "ok",
            "details": {"model_used": "vendor.other-model"}
        }));
        let outcome = orchestrator(transport).run_audit("12", HAIKU).await.unwrap();
        assert_eq!(outcome.model.id, "vendor.other-model");
        assert_eq!(outcome.model.name, UNKNOWN_MODEL_NAME);
    }

    #[tokio::test]
    async fn test_blank_claim_id_never_sends() {
        let transport = StubTransport::ok(json!({"analysis": "should not be used"}));
        let orchestrator = orchestrator(transport.clone());

        for claim_id in ["", "   "] {
            let err = orchestrator.run_audit(claim_id, HAIKU).await.unwrap_err();
            assert!(matches!(err, AuditError::Validation(_)));
            assert_eq!(err.user_message(), MISSING_CLAIM_ID_MESSAGE);
        }
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_service_message_surfaces() {
        let transport = StubTransport::replying(|| {
            Err(ClientError::Transport(ErrorEnvelope::from_response(
                404,
                r#"{"message": "Claim not found"}"#,
            )))
        });
        let err = orchestrator(transport).run_audit("999", HAIKU).await.unwrap_err();
        assert_eq!(err.user_message(), "Claim not found");
        assert!(matches!(err, AuditError::Failed { .. }));
    }

    #[tokio::test]
    async fn test_missing_service_message_uses_generic_text() {
        let transport = StubTransport::replying(|| {
            Err(ClientError::Transport(ErrorEnvelope::from_network_failure(
                "connection reset",
            )))
        });
        let err = orchestrator(transport).run_audit("999", HAIKU).await.unwrap_err();
        assert_eq!(err.user_message(), AUDIT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_blank_model_uses_catalog_default() {
        let transport = StubTransport::ok(json!({"analysis": "ok"}));
        let outcome = orchestrator(transport.clone())
            .run_audit("5", "")
            .await
            .unwrap();

        let default_id = ModelCatalog::builtin().default_id().to_string();
        assert_eq!(outcome.model.id, default_id);
        assert_eq!(transport.sent()[0].2.get(MODEL_ID_PARAM), Some(&default_id));
    }

    #[tokio::test]
    async fn test_debug_info_attached_when_enabled() {
        let transport = StubTransport::ok(json!({"analysis": "ok", "details": {}}));
        let outcome = orchestrator(transport)
            .with_debug_info(true)
            .run_audit("5", HAIKU)
            .await
            .unwrap();

        let diagnostics = outcome.diagnostics.unwrap();
        assert!(diagnostics.has_analysis);
        assert_eq!(diagnostics.response_keys, vec!["analysis", "details"]);
    }

    #[test]
    fn test_request_body_strips_model_keys() {
        let mut extra = Map::new();
        extra.insert("claim_id".to_string(), json!(5));
        extra.insert("model_id".to_string(), json!(HAIKU));
        extra.insert("modelId".to_string(), json!(HAIKU));
        extra.insert("notes".to_string(), json!("rush"));

        let request = AuditRequest::new(5, HAIKU).with_body(extra);
        assert_eq!(request.body(), json!({"claim_id": 5, "notes": "rush"}));
    }

    proptest! {
        #[test]
        fn prop_model_id_only_in_query(
            fields in proptest::collection::btree_map("[a-zA-Z_]{1,12}", "[a-z0-9 ]{0,8}", 0..6),
            include_model_key in any::<bool>(),
        ) {
            let mut extra: Map<String, Value> = fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            if include_model_key {
                extra.insert("model_id".to_string(), json!("smuggled"));
            }

            let transport = StubTransport::ok(json!({"analysis": "ok"}));
            let orchestrator = orchestrator(transport.clone());
            let request = AuditRequest::new("C-1", HAIKU).with_body(extra.clone());

            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            runtime.block_on(orchestrator.audit(request)).unwrap();

            let sent = transport.sent();
            let (_, body, query) = &sent[0];
            prop_assert_eq!(query.get(MODEL_ID_PARAM).map(String::as_str), Some(HAIKU));
            prop_assert_eq!(query.len(), 1);
            let body = body.as_object().unwrap();
            prop_assert!(!body.contains_key("model_id"));
            prop_assert!(!body.contains_key("modelId"));
            for (key, value) in &extra {
                if key != "model_id" && key != "modelId" {
                    prop_assert_eq!(body.get(key), Some(value));
                }
            }
        }
    }
}

//! # Billing API Gateway
//!
//! Single choke point for every call to the billing service. Builds URLs from the
//! resolved [`EndpointConfig`], sends JSON with the default headers, normalizes every
//! failure into an [`ErrorEnvelope`] and reports each request to a [`RequestObserver`].
//!
//! The gateway holds no mutable state: no retries, no caching, no deduplication.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::api_clients::paths::ApiPath;
use crate::config::EndpointConfig;
use crate::error::{ClientError, ClientResult, ErrorEnvelope};
use crate::transport::{ApiTransport, QueryParams};

/// A request about to be sent
#[derive(Debug)]
pub struct RequestEvent<'a> {
    pub method: &'a Method,
    pub path: &'a ApiPath,
    pub url: &'a Url,
    pub query: &'a QueryParams,
    pub headers: &'a HeaderMap,
    pub payload: Option<&'a Value>,
}

/// A request that completed with a 2xx status
#[derive(Debug)]
pub struct ResponseEvent<'a> {
    pub method: &'a Method,
    pub path: &'a ApiPath,
    pub status: StatusCode,
    pub headers: &'a HeaderMap,
    pub body: &'a Value,
    pub elapsed: Duration,
}

/// A request that failed in transport or with a non-2xx status
#[derive(Debug)]
pub struct FailureEvent<'a> {
    pub method: &'a Method,
    pub path: &'a ApiPath,
    pub envelope: &'a ErrorEnvelope,
    pub elapsed: Duration,
}

/// Receives gateway instrumentation.
///
/// Implementations run inline on the request path and should return quickly.
/// A panicking observer is contained by the gateway and never fails the request.
pub trait RequestObserver: Send + Sync {
    fn on_dispatch(&self, event: &RequestEvent<'_>);
    fn on_success(&self, event: &ResponseEvent<'_>);
    fn on_failure(&self, event: &FailureEvent<'_>);
}

/// Observer that writes `tracing` events.
///
/// Method and path are always logged; headers and payloads only with diagnostics on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    diagnostics: bool,
}

impl TracingObserver {
    #[must_use]
    pub fn new(diagnostics: bool) -> Self {
        Self { diagnostics }
    }

    #[must_use]
    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }
}

impl RequestObserver for TracingObserver {
    fn on_dispatch(&self, event: &RequestEvent<'_>) {
        if self.diagnostics {
            debug!(
                method = %event.method,
                path = %event.path,
                url = %event.url,
                query = ?event.query,
                headers = ?event.headers,
                payload = ?event.payload,
                "Dispatching billing API request"
            );
        } else {
            debug!(method = %event.method, path = %event.path, "Dispatching billing API request");
        }
    }

    fn on_success(&self, event: &ResponseEvent<'_>) {
        if self.diagnostics {
            debug!(
                method = %event.method,
                path = %event.path,
                status = event.status.as_u16(),
                elapsed_ms = event.elapsed.as_millis() as u64,
                headers = ?event.headers,
                body = %event.body,
                "Billing API request succeeded"
            );
        } else {
            info!(
                method = %event.method,
                path = %event.path,
                status = event.status.as_u16(),
                elapsed_ms = event.elapsed.as_millis() as u64,
                "Billing API request succeeded"
            );
        }
    }

    fn on_failure(&self, event: &FailureEvent<'_>) {
        if self.diagnostics {
            error!(
                method = %event.method,
                path = %event.path,
                status = ?event.envelope.http_status,
                message = %event.envelope.message(),
                raw = %event.envelope.raw,
                elapsed_ms = event.elapsed.as_millis() as u64,
                "Billing API request failed"
            );
        } else {
            error!(
                method = %event.method,
                path = %event.path,
                status = ?event.envelope.http_status,
                message = %event.envelope.message(),
                "Billing API request failed"
            );
        }
    }
}

/// Observer that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl RequestObserver for SilentObserver {
    fn on_dispatch(&self, _event: &RequestEvent<'_>) {}
    fn on_success(&self, _event: &ResponseEvent<'_>) {}
    fn on_failure(&self, _event: &FailureEvent<'_>) {}
}

/// HTTP gateway to the billing API
///
/// # Examples
///
/// ```rust,no_run
/// use claims_audit::api_clients::{paths::Resource, HttpGateway};
/// use claims_audit::config::{DeploymentSignals, EndpointConfig};
/// use claims_audit::transport::{ApiTransport, QueryParams};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoint = EndpointConfig::resolve(&DeploymentSignals::default(), false, 30000)?;
/// let gateway = HttpGateway::new(endpoint)?;
///
/// let patients = gateway
///     .read(&Resource::Patients.collection(), &QueryParams::new())
///     .await?;
/// println!("{patients}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    endpoint: EndpointConfig,
    headers: HeaderMap,
    observer: Arc<dyn RequestObserver>,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.endpoint.base_url.as_str())
            .field("mode", &self.endpoint.mode)
            .field("timeout_ms", &self.endpoint.timeout_ms)
            .field("diagnostics", &self.endpoint.diagnostics)
            .finish()
    }
}

impl HttpGateway {
    /// Create a gateway that logs through `tracing`
    pub fn new(endpoint: EndpointConfig) -> ClientResult<Self> {
        let observer = TracingObserver::new(endpoint.diagnostics);
        Self::with_observer(endpoint, Arc::new(observer))
    }

    /// Create a gateway reporting to the given observer
    pub fn with_observer(
        endpoint: EndpointConfig,
        observer: Arc<dyn RequestObserver>,
    ) -> ClientResult<Self> {
        let headers = build_headers(&endpoint)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(endpoint.timeout_ms))
            .user_agent(format!("claims-audit-client/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers.clone())
            .build()
            .map_err(|e| {
                ClientError::config_error(format!("Failed to create HTTP client: {}", e))
            })?;

        debug!(
            base_url = %endpoint.base_url,
            environment = %endpoint.mode,
            timeout_ms = endpoint.timeout_ms,
            "Created billing API gateway"
        );

        Ok(Self {
            client,
            endpoint,
            headers,
            observer,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.endpoint.base_url.as_str()
    }

    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.endpoint.timeout_ms
    }

    /// Absolute URL for `path`, each segment percent-encoded below the base path
    pub fn url_for(&self, path: &ApiPath) -> ClientResult<Url> {
        if let Some(segment) = path
            .segments()
            .iter()
            .find(|segment| matches!(segment.as_str(), "." | ".."))
        {
            return Err(ClientError::validation(format!(
                "Path segment '{}' is not a valid identifier",
                segment
            )));
        }

        let mut url = self.endpoint.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::config_error(format!(
                    "Base URL '{}' cannot carry a path",
                    self.endpoint.base_url
                ))
            })?
            .pop_if_empty()
            .extend(path.segments());
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        path: &ApiPath,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let url = self.url_for(path)?;

        self.notify(|observer| {
            observer.on_dispatch(&RequestEvent {
                method: &method,
                path,
                url: &url,
                query,
                headers: &self.headers,
                payload: body,
            })
        });

        let started = Instant::now();
        let mut request = self.client.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let envelope = ErrorEnvelope::from_network_failure(e.to_string());
                return Err(self.failure(&method, path, envelope, started));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let mut envelope = ErrorEnvelope::from_network_failure(e.to_string());
                envelope.http_status = Some(status.as_u16());
                return Err(self.failure(&method, path, envelope, started));
            }
        };

        if !status.is_success() {
            let envelope = ErrorEnvelope::from_response(status.as_u16(), &text);
            return Err(self.failure(&method, path, envelope, started));
        }

        let data = parse_body(&text);
        self.notify(|observer| {
            observer.on_success(&ResponseEvent {
                method: &method,
                path,
                status,
                headers: &headers,
                body: &data,
                elapsed: started.elapsed(),
            })
        });

        Ok(data)
    }

    fn failure(
        &self,
        method: &Method,
        path: &ApiPath,
        envelope: ErrorEnvelope,
        started: Instant,
    ) -> ClientError {
        self.notify(|observer| {
            observer.on_failure(&FailureEvent {
                method,
                path,
                envelope: &envelope,
                elapsed: started.elapsed(),
            })
        });
        ClientError::Transport(envelope)
    }

    fn notify(&self, emit: impl FnOnce(&dyn RequestObserver)) {
        let observer = self.observer.as_ref();
        // Observer panics never reach the caller
        let _ = std::panic::catch_unwind(AssertUnwindSafe(|| emit(observer)));
    }
}

#[async_trait]
impl ApiTransport for HttpGateway {
    async fn read(&self, path: &ApiPath, query: &QueryParams) -> ClientResult<Value> {
        self.execute(Method::GET, path, query, None).await
    }

    async fn create(
        &self,
        path: &ApiPath,
        body: &Value,
        query: &QueryParams,
    ) -> ClientResult<Value> {
        self.execute(Method::POST, path, query, Some(body)).await
    }

    async fn replace(&self, path: &ApiPath, body: &Value) -> ClientResult<Value> {
        self.execute(Method::PUT, path, &QueryParams::new(), Some(body))
            .await
    }

    async fn remove(&self, path: &ApiPath) -> ClientResult<Value> {
        self.execute(Method::DELETE, path, &QueryParams::new(), None)
            .await
    }
}

fn build_headers(endpoint: &EndpointConfig) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &endpoint.default_headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ClientError::config_error(format!("Invalid header name '{}': {}", name, e))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            ClientError::config_error(format!("Invalid value for header '{}': {}", name, e))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Empty bodies become `null`; non-JSON bodies are kept as a string
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

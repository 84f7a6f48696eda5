//! # Stub Billing Service
//!
//! An axum app bound to an ephemeral port that records every request and answers
//! with a canned `(status, body)` chosen by the test.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use claims_audit::api_clients::{RequestObserver, SilentObserver};
use claims_audit::{DeploymentMode, EndpointConfig, HttpGateway};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One request as the service saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Percent-encoded path as sent on the wire
    pub path: String,
    pub query: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Responder,
}

pub struct StubBillingService {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubBillingService {
    /// Start a stub answering every request through `responder`
    pub async fn start(
        responder: impl Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            requests: requests.clone(),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(record).with_state(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Stub that answers every request with the same JSON body
    pub async fn returning(status: u16, body: Value) -> Self {
        let body = body.to_string();
        Self::start(move |_| (status, body.clone())).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn endpoint(&self) -> EndpointConfig {
        EndpointConfig::for_base_url(&self.base_url(), DeploymentMode::Development, true, 5000)
            .expect("stub endpoint")
    }

    /// Gateway pointed at this stub, logging nothing
    pub fn gateway(&self) -> HttpGateway {
        self.gateway_with(Arc::new(SilentObserver))
    }

    pub fn gateway_with(&self, observer: Arc<dyn RequestObserver>) -> HttpGateway {
        HttpGateway::with_observer(self.endpoint(), observer).expect("stub gateway")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubBillingService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };

    let (status, body) = (state.responder)(&recorded);
    state.requests.lock().unwrap().push(recorded);

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

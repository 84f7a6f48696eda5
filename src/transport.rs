//! # Transport Abstraction
//!
//! The four verb primitives every billing call is built from. [`crate::HttpGateway`]
//! is the production implementation; the audit orchestrator and the resource helpers
//! only depend on this trait, so tests can substitute an in-memory transport.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::api_clients::paths::ApiPath;
use crate::error::ClientResult;

/// Query string parameters, serialized in key order
pub type QueryParams = BTreeMap<String, String>;

/// Verb-generic access to the billing API.
///
/// Every call is independent and at-most-once: implementations must not retry,
/// cache or deduplicate requests. Failures are returned, never swallowed.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Read-only fetch (`GET`)
    async fn read(&self, path: &ApiPath, query: &QueryParams) -> ClientResult<Value>;

    /// Create (`POST`), with optional query parameters
    async fn create(&self, path: &ApiPath, body: &Value, query: &QueryParams)
        -> ClientResult<Value>;

    /// Full replacement (`PUT`)
    async fn replace(&self, path: &ApiPath, body: &Value) -> ClientResult<Value>;

    /// Delete (`DELETE`)
    async fn remove(&self, path: &ApiPath) -> ClientResult<Value>;
}

//! # Billing API Paths
//!
//! Path templates for every billing resource. Paths are kept as unencoded segments;
//! the gateway percent-encodes each segment when it joins the path onto the base URL,
//! so identifiers containing `/`, spaces or non-ASCII text stay a single segment.

use serde::{Deserialize, Serialize};

/// Opaque key of a billing resource (string or integer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl ResourceId {
    /// A text identifier with nothing but whitespace counts as missing
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            ResourceId::Number(_) => false,
            ResourceId::Text(text) => text.trim().is_empty(),
        }
    }

    /// JSON form: a number or a string, as given
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ResourceId::Number(n) => serde_json::Value::from(*n),
            ResourceId::Text(text) => serde_json::Value::String(text.clone()),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        ResourceId::Number(value)
    }
}

impl From<i32> for ResourceId {
    fn from(value: i32) -> Self {
        ResourceId::Number(i64::from(value))
    }
}

impl From<u32> for ResourceId {
    fn from(value: u32) -> Self {
        ResourceId::Number(i64::from(value))
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        ResourceId::Text(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::Text(value.to_string())
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(value: &ResourceId) -> Self {
        value.clone()
    }
}

/// Relative API path, stored as raw segments below the base URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    /// Path for a top-level collection, e.g. `/patients`
    pub fn collection(name: &str) -> Self {
        Self {
            segments: vec![name.to_string()],
        }
    }

    /// Append one raw segment
    #[must_use]
    pub fn segment(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Append a resource identifier as one segment
    #[must_use]
    pub fn id(self, id: &ResourceId) -> Self {
        self.segment(id)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for ApiPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// A CRUD collection of the billing API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Patients,
    Providers,
    Services,
    Appointments,
    Claims,
    Payments,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Patients,
        Resource::Providers,
        Resource::Services,
        Resource::Appointments,
        Resource::Claims,
        Resource::Payments,
    ];

    #[must_use]
    pub fn collection_name(self) -> &'static str {
        match self {
            Resource::Patients => "patients",
            Resource::Providers => "providers",
            Resource::Services => "services",
            Resource::Appointments => "appointments",
            Resource::Claims => "claims",
            Resource::Payments => "payments",
        }
    }

    /// `GET`/`POST /{collection}`
    ///
    /// Payments have no top-level collection; they are listed and created under a claim
    /// via [`claim_payments`].
    #[must_use]
    pub fn collection(self) -> ApiPath {
        ApiPath::collection(self.collection_name())
    }

    /// `GET`/`PUT`/`DELETE /{collection}/{id}`
    #[must_use]
    pub fn member(self, id: &ResourceId) -> ApiPath {
        self.collection().id(id)
    }
}

/// `POST /claims/{id}/audit`
#[must_use]
pub fn claim_audit(claim_id: &ResourceId) -> ApiPath {
    Resource::Claims.member(claim_id).segment("audit")
}

/// `GET`/`POST /claims/{claim_id}/payments`
#[must_use]
pub fn claim_payments(claim_id: &ResourceId) -> ApiPath {
    Resource::Claims.member(claim_id).segment("payments")
}

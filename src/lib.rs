#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Claims Audit Client
//!
//! API access and audit orchestration for the medical billing back office.
//!
//! ## Module Organization
//!
//! - [`api_clients`] - HTTP gateway, path templates and resource helpers
//! - [`audit`] - Claim audit workflow and model catalog
//! - [`config`] - Deployment-mode detection and client settings
//! - [`transport`] - Verb primitives shared by the gateway and its test doubles
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use claims_audit::{AuditOrchestrator, BillingApi, ClientConfig, EndpointConfig, HttpGateway};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::load()?;
//! let endpoint = EndpointConfig::process_default(&config.gateway)?;
//! let gateway = Arc::new(HttpGateway::new(endpoint.clone())?);
//!
//! let claims = gateway.get_claims(&Default::default()).await?;
//! println!("{claims}");
//!
//! let orchestrator = AuditOrchestrator::new(gateway, config.audit.catalog()?);
//! let default_model = orchestrator.catalog().default_id().to_string();
//! let outcome = orchestrator.run_audit("1042", &default_model).await?;
//! println!("{}", outcome.analysis_text());
//! # Ok(())
//! # }
//! ```

pub mod api_clients;
pub mod audit;
pub mod config;
pub mod error;
pub mod logging;
pub mod transport;

// Re-export commonly used types for convenience
pub use api_clients::{ApiPath, BillingApi, HttpGateway, Resource, ResourceId};
pub use audit::{AuditError, AuditOrchestrator, AuditOutcome, AuditRequest, ModelCatalog};
pub use config::{ClientConfig, DeploymentMode, DeploymentSignals, EndpointConfig};
pub use error::{ClientError, ClientResult, ErrorEnvelope};
pub use transport::{ApiTransport, QueryParams};

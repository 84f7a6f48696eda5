//! API Client Modules
//!
//! The HTTP gateway to the billing service, its path templates, and the typed
//! resource helpers built on the gateway's verb primitives.

pub mod gateway;
pub mod paths;
pub mod resources;

pub use gateway::{
    FailureEvent, HttpGateway, RequestEvent, RequestObserver, ResponseEvent, SilentObserver,
    TracingObserver,
};
pub use paths::{ApiPath, Resource, ResourceId};
pub use resources::BillingApi;

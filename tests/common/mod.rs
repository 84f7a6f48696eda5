//! Shared helpers for integration tests

pub mod stub_service;

pub use stub_service::{RecordedRequest, StubBillingService};

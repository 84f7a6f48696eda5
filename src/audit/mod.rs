//! Claim audit workflow
//!
//! Request shaping and response interpretation for AI-driven claim audits.

pub mod catalog;
pub mod extraction;
pub mod in_flight;
pub mod orchestrator;

pub use catalog::{ModelCatalog, ModelInfo, DEFAULT_MODEL_ID};
pub use extraction::{
    extract_analysis, resolve_model, AnalysisExtraction, AuditDiagnostics, EMPTY_ANALYSIS_TEXT,
    UNKNOWN_MODEL_NAME, UNKNOWN_MODEL_PROVIDER,
};
pub use in_flight::{InFlight, InFlightGuard};
pub use orchestrator::{
    AuditError, AuditOrchestrator, AuditOutcome, AuditRequest, AUDIT_FAILURE_MESSAGE,
    MISSING_CLAIM_ID_MESSAGE, MODEL_ID_PARAM,
};

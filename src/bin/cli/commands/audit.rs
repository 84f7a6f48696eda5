//! Audit and model catalog command handlers

use std::sync::Arc;

use anyhow::anyhow;
use claims_audit::audit::InFlight;
use claims_audit::{AuditOrchestrator, AuditRequest, ClientConfig};

use crate::cli::{build_gateway, parse_id, parse_object};

pub fn handle_models_command(config: &ClientConfig) -> anyhow::Result<()> {
    let catalog = config.audit.catalog()?;
    for model in catalog.models() {
        let marker = if model.id == catalog.default_id() { "*" } else { " " };
        println!("{} {:<48} {}", marker, model.id, model);
    }
    Ok(())
}

pub async fn handle_audit_command(
    config: &ClientConfig,
    claim_id: String,
    model: Option<String>,
    body: Option<String>,
    debug_info: bool,
) -> anyhow::Result<()> {
    let catalog = config.audit.catalog()?;
    let model_id = model.unwrap_or_else(|| catalog.default_id().to_string());

    let mut request = AuditRequest::new(parse_id(&claim_id), model_id);
    if let Some(raw) = body {
        let mut extra = request.extra_body.clone();
        extra.extend(parse_object(&raw)?);
        request = request.with_body(extra);
    }

    let gateway = Arc::new(build_gateway(config)?);
    let orchestrator = AuditOrchestrator::new(gateway, catalog)
        .with_debug_info(debug_info || config.audit.show_debug_info);

    println!("Auditing claim {} with {}...", request.claim_id, request.model_id);

    let in_flight = InFlight::new();
    let result = in_flight
        .run(orchestrator.audit(request))
        .await
        .ok_or_else(|| anyhow!("An audit is already in progress"))?;

    match result {
        Ok(outcome) => {
            println!();
            println!("Audit Result");
            println!("Model: {}", outcome.model);
            println!();
            println!("{}", outcome.analysis_text());

            if let Some(diagnostics) = &outcome.diagnostics {
                println!();
                println!("Debug Information");
                println!("{}", serde_json::to_string_pretty(diagnostics)?);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Error: {}", e.user_message());
            Err(e.into())
        }
    }
}

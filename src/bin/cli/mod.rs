//! CLI module for the claims audit tool
//!
//! Command handlers plus the argument parsing helpers they share.

pub mod commands;

use anyhow::{anyhow, Context};
use claims_audit::{ClientConfig, EndpointConfig, HttpGateway, ResourceId};
use serde_json::Value;

pub use commands::{
    handle_audit_command, handle_config_command, handle_models_command, handle_payment_command,
    handle_resource_command,
};

/// Parse a `key=value` query pair
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

/// Canonical integers stay numeric; anything else is sent as typed
pub fn parse_id(raw: &str) -> ResourceId {
    match raw.parse::<i64>() {
        Ok(n) if n.to_string() == raw => ResourceId::Number(n),
        _ => ResourceId::Text(raw.to_string()),
    }
}

/// Parse a JSON object argument
pub fn parse_object(raw: &str) -> anyhow::Result<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).context("Invalid JSON input")? {
        Value::Object(object) => Ok(object),
        other => Err(anyhow!("Expected a JSON object, got: {}", other)),
    }
}

/// Gateway for the endpoint resolved once for this process
pub fn build_gateway(config: &ClientConfig) -> anyhow::Result<HttpGateway> {
    let endpoint = EndpointConfig::process_default(&config.gateway)?;
    Ok(HttpGateway::new(endpoint.clone())?)
}

pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_audit::Resource;

    #[test]
    fn test_parse_id_keeps_text_identifiers_verbatim() {
        assert_eq!(parse_id("42"), ResourceId::Number(42));
        assert_eq!(parse_id("-3"), ResourceId::Number(-3));

        for raw in ["007", "+5", " 42", "42 ", "C-100", ""] {
            let id = parse_id(raw);
            assert_eq!(id, ResourceId::Text(raw.to_string()));
            assert_eq!(id.to_string(), raw);
        }

        assert_eq!(
            Resource::Patients.member(&parse_id("007")).to_string(),
            "/patients/007"
        );
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("status=pending=review"),
            Ok(("status".to_string(), "pending=review".to_string()))
        );
        assert!(parse_key_value("=x").is_err());
        assert!(parse_key_value("status").is_err());
    }

    #[test]
    fn test_parse_object_rejects_non_objects() {
        assert!(parse_object(r#"{"amount": 40}"#).is_ok());
        assert!(parse_object("[1, 2]").is_err());
        assert!(parse_object("{").is_err());
    }
}

//! CRUD command handlers for billing records

use claims_audit::{BillingApi, ClientConfig, QueryParams, Resource};
use serde_json::Value;

use crate::cli::{build_gateway, parse_id, parse_object, print_json};
use crate::{CrudCommands, PaymentCommands};

pub async fn handle_resource_command(
    resource: Resource,
    cmd: CrudCommands,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;

    let result = match cmd {
        CrudCommands::List { query } => {
            let query: QueryParams = query.into_iter().collect();
            gateway.list(resource, &query).await
        }
        CrudCommands::Get { id } => gateway.fetch(resource, &parse_id(&id)).await,
        CrudCommands::Create { data } => {
            let data = Value::Object(parse_object(&data)?);
            gateway.create_in(resource, &data).await
        }
        CrudCommands::Update { id, data } => {
            let data = Value::Object(parse_object(&data)?);
            gateway.update_in(resource, &parse_id(&id), &data).await
        }
        CrudCommands::Delete { id } => gateway.delete_from(resource, &parse_id(&id)).await,
    };

    report(resource.collection_name(), result)
}

pub async fn handle_payment_command(
    cmd: PaymentCommands,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;

    let result = match cmd {
        PaymentCommands::List { claim_id } => {
            gateway.get_payments_for_claim(&parse_id(&claim_id)).await
        }
        PaymentCommands::Get { id } => gateway.get_payment(&parse_id(&id)).await,
        PaymentCommands::Create { claim_id, data } => {
            let data = Value::Object(parse_object(&data)?);
            gateway
                .create_payment_for_claim(&parse_id(&claim_id), &data)
                .await
        }
        PaymentCommands::Update { id, data } => {
            let data = Value::Object(parse_object(&data)?);
            gateway.update_payment(&parse_id(&id), &data).await
        }
        PaymentCommands::Delete { id } => gateway.delete_payment(&parse_id(&id)).await,
    };

    report("payments", result)
}

fn report(collection: &str, result: claims_audit::ClientResult<Value>) -> anyhow::Result<()> {
    match result {
        Ok(body) => print_json(&body),
        Err(e) => {
            eprintln!("✗ {} request failed: {}", collection, e.user_message());
            Err(e.into())
        }
    }
}

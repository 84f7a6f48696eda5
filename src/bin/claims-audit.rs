//! # Claims Audit CLI
//!
//! Command-line front end for the billing back office: CRUD over patients, providers,
//! services, appointments, claims and payments, plus AI claim audits.

mod cli;

use anyhow::Context;
use clap::{Parser, Subcommand};
use claims_audit::{logging, ClientConfig};
use tracing::info;

use cli::{handle_audit_command, handle_config_command, handle_payment_command, handle_resource_command};

#[derive(Parser, Debug)]
#[command(name = "claims-audit")]
#[command(about = "Command-line interface for the medical billing back office")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (default: ~/.claims-audit/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the models available for claim audits
    Models,

    /// Run an AI audit of a claim
    Audit {
        /// Claim ID
        #[arg(value_name = "CLAIM_ID")]
        claim_id: String,
        /// Model ID (default: the catalog default)
        #[arg(short, long)]
        model: Option<String>,
        /// Extra request body fields as a JSON object
        #[arg(short, long)]
        body: Option<String>,
        /// Print response diagnostics with the result
        #[arg(long, env = "CLAIMS_AUDIT_SHOW_DEBUG_INFO")]
        debug_info: bool,
    },

    /// Patient records
    #[command(subcommand)]
    Patients(CrudCommands),

    /// Provider records
    #[command(subcommand)]
    Providers(CrudCommands),

    /// Billable services
    #[command(subcommand)]
    Services(CrudCommands),

    /// Appointments
    #[command(subcommand)]
    Appointments(CrudCommands),

    /// Claims
    #[command(subcommand)]
    Claims(CrudCommands),

    /// Payments against claims
    #[command(subcommand)]
    Payments(PaymentCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, Subcommand)]
pub enum CrudCommands {
    /// List records
    List {
        /// Query filter as key=value (repeatable; used by appointments and claims)
        #[arg(short, long = "query", value_parser = cli::parse_key_value)]
        query: Vec<(String, String)>,
    },
    /// Get one record by ID
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Create a record from a JSON object
    Create {
        /// Record as JSON
        #[arg(short, long)]
        data: String,
    },
    /// Replace a record
    Update {
        #[arg(value_name = "ID")]
        id: String,
        /// Record as JSON
        #[arg(short, long)]
        data: String,
    },
    /// Delete a record
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommands {
    /// List payments recorded against a claim
    List {
        #[arg(value_name = "CLAIM_ID")]
        claim_id: String,
    },
    /// Get one payment by ID
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Record a payment against a claim
    Create {
        #[arg(value_name = "CLAIM_ID")]
        claim_id: String,
        /// Payment as JSON
        #[arg(short, long)]
        data: String,
    },
    /// Replace a payment
    Update {
        #[arg(value_name = "ID")]
        id: String,
        /// Payment as JSON
        #[arg(short, long)]
        data: String,
    },
    /// Delete a payment
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration and resolved endpoint
    Show,
    /// Write the effective configuration to the default path
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_structured_logging(cli.verbose);

    let config = match cli.config {
        Some(config_path) => {
            let mut config = ClientConfig::load_from_file(std::path::Path::new(&config_path))
                .with_context(|| format!("Failed to load configuration from {}", config_path))?;
            config.apply_env_overrides();
            config
        }
        None => ClientConfig::load().context("Failed to load configuration")?,
    };

    info!(
        timeout_ms = config.gateway.timeout_ms,
        default_model = ?config.audit.default_model,
        "Claims audit CLI starting"
    );

    match cli.command {
        Commands::Models => cli::handle_models_command(&config),
        Commands::Audit {
            claim_id,
            model,
            body,
            debug_info,
        } => handle_audit_command(&config, claim_id, model, body, debug_info).await,
        Commands::Patients(cmd) => {
            handle_resource_command(claims_audit::Resource::Patients, cmd, &config).await
        }
        Commands::Providers(cmd) => {
            handle_resource_command(claims_audit::Resource::Providers, cmd, &config).await
        }
        Commands::Services(cmd) => {
            handle_resource_command(claims_audit::Resource::Services, cmd, &config).await
        }
        Commands::Appointments(cmd) => {
            handle_resource_command(claims_audit::Resource::Appointments, cmd, &config).await
        }
        Commands::Claims(cmd) => {
            handle_resource_command(claims_audit::Resource::Claims, cmd, &config).await
        }
        Commands::Payments(cmd) => handle_payment_command(cmd, &config).await,
        Commands::Config(cmd) => handle_config_command(cmd, &config),
    }
}

//! Command handlers for the claims audit CLI

pub mod audit;
pub mod config;
pub mod resources;

pub use audit::{handle_audit_command, handle_models_command};
pub use config::handle_config_command;
pub use resources::{handle_payment_command, handle_resource_command};

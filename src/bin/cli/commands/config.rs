//! Configuration command handlers

use anyhow::bail;
use claims_audit::{ClientConfig, EndpointConfig};

use crate::ConfigCommands;

pub fn handle_config_command(cmd: ConfigCommands, config: &ClientConfig) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let endpoint = EndpointConfig::process_default(&config.gateway)?;
            println!("Environment: {}", endpoint.mode);
            println!("Base URL:    {}", endpoint.base_url);
            println!("Diagnostics: {}", endpoint.diagnostics);
            println!();
            println!("{}", toml::to_string_pretty(config)?);
        }
        ConfigCommands::Init { force } => {
            let path = ClientConfig::default_config_path()?;
            if path.exists() && !force {
                bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            config.save_to_file(&path)?;
            println!("✓ Wrote configuration to {}", path.display());
        }
    }
    Ok(())
}

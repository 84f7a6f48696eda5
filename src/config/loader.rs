//! Configuration Loader
//!
//! Loads [`ClientConfig`] from the first config file found in the standard locations,
//! then applies environment variable overrides.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{parse_flag, ClientConfig};
use crate::error::{ClientError, ClientResult};

impl ClientConfig {
    /// Load configuration from environment variables and config file
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (first of the standard locations)
    /// 3. Default values
    pub fn load() -> ClientResult<Self> {
        let mut config = match Self::find_config_file() {
            Some(config_path) => Self::file_or_default(&config_path),
            None => Self::default(),
        };

        config.apply_env_overrides();

        debug!("Loaded client configuration: {:?}", config);
        Ok(config)
    }

    /// Settings from `path`, or the defaults with a warning when the file is unusable
    fn file_or_default(path: &Path) -> Self {
        debug!("Loading config from: {}", path.display());
        match Self::load_from_file(path) {
            Ok(file_config) => file_config,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unreadable config file, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ClientError::config_error(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let mut possible_paths = vec![
            PathBuf::from("./claims-audit.toml"),
            PathBuf::from("./config/claims-audit.toml"),
        ];
        if let Some(home) = dirs::home_dir() {
            possible_paths.push(home.join(".claims-audit").join("config.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            possible_paths.push(config_dir.join("claims-audit").join("client.toml"));
        }

        possible_paths
            .into_iter()
            .find(|path| path.exists() && path.is_file())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(timeout) = std::env::var("CLAIMS_AUDIT_TIMEOUT_MS") {
            if let Ok(timeout_ms) = timeout.parse() {
                self.gateway.timeout_ms = timeout_ms;
            }
        }
        if let Ok(debug) = std::env::var("CLAIMS_AUDIT_DEBUG") {
            self.gateway.diagnostics = Some(parse_flag(&debug));
        }
        if let Ok(show) = std::env::var("CLAIMS_AUDIT_SHOW_DEBUG_INFO") {
            self.audit.show_debug_info = parse_flag(&show);
        }
        if let Ok(model) = std::env::var("CLAIMS_AUDIT_DEFAULT_MODEL") {
            if !model.trim().is_empty() {
                self.audit.default_model = Some(model);
            }
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::config_error(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get default config file path
    pub fn default_config_path() -> ClientResult<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ClientError::config_error("Could not determine home directory"))?;

        Ok(home_dir.join(".claims-audit").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::catalog::ModelInfo;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("claims-audit.toml");

        let mut original = ClientConfig::default();
        original.gateway.timeout_ms = 5000;
        original.audit.show_debug_info = true;
        original.save_to_file(&config_path).unwrap();

        let loaded = ClientConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.gateway.timeout_ms, 5000);
        assert!(loaded.audit.show_debug_info);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("claims-audit.toml");
        std::fs::write(
            &config_path,
            r#"
[audit]
default_model = "local.test-model"

[[audit.models]]
id = "local.test-model"
name = "Test Model"
provider = "Local"
"#,
        )
        .unwrap();

        let loaded = ClientConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.gateway.timeout_ms, super::super::DEFAULT_TIMEOUT_MS);
        assert_eq!(
            loaded.audit.models,
            vec![ModelInfo::new("local.test-model", "Test Model", "Local")]
        );
        let catalog = loaded.audit.catalog().unwrap();
        assert_eq!(catalog.default_id(), "local.test-model");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "gateway = [").unwrap();

        let result = ClientConfig::load_from_file(&config_path);
        assert!(matches!(result, Err(ClientError::ConfigError(_))));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_malformed_file_warns_and_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("claims-audit.toml");
        std::fs::write(&config_path, "[gateway\ntimeout_ms = 5").unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            ClientConfig::file_or_default(&config_path)
        });

        assert_eq!(config.gateway.timeout_ms, super::super::DEFAULT_TIMEOUT_MS);
        assert!(config.audit.models.is_empty());
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("Ignoring unreadable config file"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("absent.toml");

        let result = ClientConfig::load_from_file(&config_path);
        assert!(matches!(
            result,
            Err(ClientError::IoError(ref e)) if e.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn test_save_into_file_path_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let result = ClientConfig::default().save_to_file(&blocker.join("config.toml"));
        assert!(matches!(result, Err(ClientError::IoError(_))));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("CLAIMS_AUDIT_TIMEOUT_MS", "1234");
        std::env::set_var("CLAIMS_AUDIT_DEBUG", "true");
        std::env::set_var("CLAIMS_AUDIT_SHOW_DEBUG_INFO", "1");
        std::env::set_var("CLAIMS_AUDIT_DEFAULT_MODEL", "anthropic.claude-3-haiku-20240307-v1:0");

        let mut config = ClientConfig::default();
        config.apply_env_overrides();

        std::env::remove_var("CLAIMS_AUDIT_TIMEOUT_MS");
        std::env::remove_var("CLAIMS_AUDIT_DEBUG");
        std::env::remove_var("CLAIMS_AUDIT_SHOW_DEBUG_INFO");
        std::env::remove_var("CLAIMS_AUDIT_DEFAULT_MODEL");

        assert_eq!(config.gateway.timeout_ms, 1234);
        assert_eq!(config.gateway.diagnostics, Some(true));
        assert!(config.audit.show_debug_info);
        assert_eq!(
            config.audit.default_model.as_deref(),
            Some("anthropic.claude-3-haiku-20240307-v1:0")
        );
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_override_ignored() {
        std::env::set_var("CLAIMS_AUDIT_TIMEOUT_MS", "soon");
        let mut config = ClientConfig::default();
        config.apply_env_overrides();
        std::env::remove_var("CLAIMS_AUDIT_TIMEOUT_MS");

        assert_eq!(config.gateway.timeout_ms, super::super::DEFAULT_TIMEOUT_MS);
    }
}

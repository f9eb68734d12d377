/// Service configuration, loaded from a JSON file with environment overrides
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Identity provider connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySettings {
    /// Base URL of the identity provider
    pub base_url: String,
    /// Service API key sent alongside user bearer tokens
    pub api_key: String,
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    pub identity: IdentitySettings,
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "members.db".to_string()
}

fn default_catalog_path() -> String {
    "catalog.json".to_string()
}

impl AppConfig {
    /// Loads configuration from a JSON file, applies environment overrides,
    /// and validates the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: AppConfig = serde_json::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Overrides for values that should come from the deployment environment
    /// rather than the config file (secrets, per-host bindings).
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ASCEND_PORT") {
            if let Ok(port) = v.parse() {
                self.port = port;
            }
        }
        if let Ok(v) = std::env::var("ASCEND_DB_PATH") {
            self.db_path = v;
        }
        if let Ok(v) = std::env::var("ASCEND_IDENTITY_URL") {
            self.identity.base_url = v;
        }
        if let Ok(v) = std::env::var("ASCEND_IDENTITY_KEY") {
            self.identity.api_key = v;
        }
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        url::Url::parse(&self.identity.base_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let json = r#"{
            "address": "127.0.0.1",
            "port": 9000,
            "db_path": "test.db",
            "catalog_path": "items.json",
            "identity": { "base_url": "https://id.example.com", "api_key": "k" }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.identity.base_url, "https://id.example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let json = r#"{ "identity": { "base_url": "https://id.example.com", "api_key": "k" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, "members.db");
        assert_eq!(config.catalog_path, "catalog.json");
    }

    #[test]
    fn rejects_invalid_identity_url() {
        let json = r#"{ "identity": { "base_url": "not a url", "api_key": "k" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }
}

//! Server configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// redb database file
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    /// Model version tag for requests that do not name one
    #[serde(default = "default_model_version")]
    pub model_version: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage_path() -> String {
    "./data/riskops.redb".to_string()
}

fn default_model_version() -> String {
    riskops_engine::DEFAULT_MODEL_VERSION.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage_path: default_storage_path(),
            model_version: default_model_version(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, std::io::Error> {
        toml::from_str(content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.model_version, "baseline-historical-v1");
    }

    #[test]
    fn test_partial_toml() {
        let config = ServerConfig::from_toml(
            r#"
            port = 9000
            storage_path = "/tmp/risk.redb"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.storage_path, "/tmp/risk.redb");
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_toml() {
        let err = ServerConfig::from_toml("port = \"eighty\"").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("riskops.toml");
        std::fs::write(&path, "host = \"0.0.0.0\"\n").unwrap();
        assert_eq!(ServerConfig::from_file(&path).unwrap().host, "0.0.0.0");
    }
}

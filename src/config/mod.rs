//! Configuration loading and management.
//!
//! Configuration comes from an optional YAML file, with environment
//! variables taking precedence. The storage backend is not named
//! explicitly: it is inferred from the `database_url` scheme, and a missing
//! url selects the in-memory store.

use anyhow::Result;
use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Interface to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the HTTP listener to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database url (`sqlite://...` or `postgres://...`). `None` selects
    /// the in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Resolve configuration for the running process: the file named by
    /// `CAMPUS_CONFIG` (when set), then `CAMPUS_HOST` / `CAMPUS_PORT` /
    /// `DATABASE_URL` overrides on top.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("CAMPUS_CONFIG") {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(host) = std::env::var("CAMPUS_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("CAMPUS_PORT") {
            config.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid CAMPUS_PORT `{port}`: {e}"))?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = Some(url);
        }

        Ok(config)
    }

    /// The address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

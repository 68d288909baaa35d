//! Server configuration
//!
//! Every section is optional and falls back to defaults, so the server runs
//! without a config file as long as the credential environment variables are
//! set. Secrets never live in the file: it only names the variables that
//! hold them.

use crate::client::{Credentials, NaverConfig};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Files tried, in order, when no explicit config path is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["naver-search.toml", "config/naver-search.toml"];

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub naver: NaverSection,
    pub health: HealthSection,
}

/// Identity reported in the `initialize` handshake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub name: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Remote provider section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NaverSection {
    /// Base URL of the Open API
    pub base_url: String,
    /// Environment variable containing the client id
    pub client_id_env: String,
    /// Environment variable containing the client secret
    pub client_secret_env: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NaverSection {
    fn default() -> Self {
        Self {
            base_url: "https://openapi.naver.com".to_string(),
            client_id_env: "NAVER_CLIENT_ID".to_string(),
            client_secret_env: "NAVER_CLIENT_SECRET".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Optional HTTP health endpoint; disabled unless a port is set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthSection {
    pub port: Option<u16>,
    pub bind_address: IpAddr,
}

impl Default for HealthSection {
    fn default() -> Self {
        Self {
            port: None,
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }
}

impl HealthSection {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.port.map(|port| SocketAddr::new(self.bind_address, port))
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ServerConfig {
    /// Load and validate configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, else the first default path that exists,
    /// else built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load_from_file(path)?, Some(path.to_path_buf())));
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = Path::new(candidate);
            if path.exists() {
                return Ok((Self::load_from_file(path)?, Some(path.to_path_buf())));
            }
        }

        Ok((Self::default(), None))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "server.name must not be empty".to_string(),
            ));
        }

        let url = url::Url::parse(&self.naver.base_url).map_err(|e| {
            ConfigError::InvalidConfig(format!("naver.base_url is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidConfig(format!(
                "naver.base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.naver.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "naver.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Read the credential pair from the environment
    ///
    /// Missing and empty variables are both errors; startup treats this as
    /// fatal.
    pub fn resolve_credentials(&self) -> Result<Credentials, ConfigError> {
        let client_id = get_env_var_required(&self.naver.client_id_env)?;
        let client_secret = get_env_var_required(&self.naver.client_secret_env)?;
        Ok(Credentials::new(client_id, client_secret))
    }

    pub fn naver_config(&self, credentials: Credentials) -> NaverConfig {
        NaverConfig {
            base_url: self.naver.base_url.clone(),
            timeout: Duration::from_secs(self.naver.timeout_secs),
            credentials,
        }
    }
}

fn get_env_var_required(env_var_name: &str) -> Result<String, ConfigError> {
    match std::env::var(env_var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::EnvVarNotFound(env_var_name.to_string())),
    }
}

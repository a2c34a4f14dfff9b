//! Configuration management for the findash CLI and SDK

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{AppError, Result};

/// Environment variable overriding the configured API endpoint
pub const ENDPOINT_ENV: &str = "FINDASH_API_URL";

const DEFAULT_ENDPOINT: &str = "https://api.findash.app";

/// CLI-level configuration persisted under the storage directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub endpoint: String,
    pub timeout: u64,
    pub verbose: bool,
    pub storage_dir: PathBuf,
    pub session_storage_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: 30,
            verbose: false,
            storage_dir: default_storage_dir(),
            session_storage_enabled: true,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        Self::load_from(&default_config_path()).await
    }

    /// Read the config file, creating it with defaults when missing or
    /// unparseable; `FINDASH_API_URL` overrides the stored endpoint
    pub async fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .await
                .map_err(|e| AppError::unknown(format!("Failed to read config: {}", e)))?;

            match serde_json::from_str::<Self>(&content) {
                Ok(config) => config,
                Err(_) => {
                    let config = Self::default();
                    config.save(config_path).await?;
                    config
                }
            }
        } else {
            let config = Self::default();
            config.save(config_path).await?;
            config
        };

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }

        Ok(config)
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::unknown(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)
            .await
            .map_err(|e| AppError::unknown(format!("Failed to write config: {}", e)))?;
        Ok(())
    }

    /// Derive the SDK-level configuration
    pub fn to_client_config(&self) -> ClientConfig {
        let normalized_endpoint = if self.endpoint.ends_with("/api") {
            self.endpoint.clone()
        } else if self.endpoint.ends_with('/') {
            format!("{}api", self.endpoint)
        } else {
            format!("{}/api", self.endpoint)
        };

        let use_proxy = !normalized_endpoint.contains("localhost")
            && !normalized_endpoint.contains("127.0.0.1");

        let mut builder = ClientConfigBuilder::new()
            .base_url(&normalized_endpoint)
            .timeout(self.timeout)
            .verbose(self.verbose)
            .use_proxy(use_proxy);

        if self.session_storage_enabled {
            builder = builder.session_file(self.storage_dir.join("session.json"));
        }

        builder.build().unwrap_or_else(|_| {
            ClientConfigBuilder::new()
                .base_url(DEFAULT_ENDPOINT)
                .build()
                .unwrap()
        })
    }
}

pub fn default_storage_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".findash")
}

pub fn default_config_path() -> PathBuf {
    default_storage_dir().join("config.json")
}

/// SDK-level configuration consumed by the transport and client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: u64,
    pub verbose: bool,
    pub use_proxy: bool,
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(AppError::validation("Base URL must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AppError::validation(format!(
                "Invalid base URL: {}",
                self.base_url
            )));
        }
        if self.timeout == 0 {
            return Err(AppError::validation("Timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Absolute URL for an endpoint path
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<u64>,
    verbose: bool,
    use_proxy: bool,
    session_file: Option<PathBuf>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn use_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = use_proxy;
        self
    }

    pub fn session_file(mut self, path: PathBuf) -> Self {
        self.session_file = Some(path);
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let config = ClientConfig {
            base_url: self.base_url.unwrap_or_default(),
            timeout: self.timeout.unwrap_or(30),
            verbose: self.verbose,
            use_proxy: self.use_proxy,
            session_file: self.session_file,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Handles the CLI `config` subcommands
pub struct ConfigService {
    config: AppConfig,
    config_path: PathBuf,
}

impl ConfigService {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            config_path: default_config_path(),
        }
    }

    pub fn with_config_path(config: AppConfig, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
        }
    }

    pub fn current(&self) -> &AppConfig {
        &self.config
    }

    pub async fn set_endpoint(&mut self, url: String) -> Result<()> {
        self.config.endpoint = url;
        self.config.save(&self.config_path).await
    }

    pub async fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(AppError::validation("Timeout must be greater than zero"));
        }
        self.config.timeout = seconds;
        self.config.save(&self.config_path).await
    }

    pub async fn set_verbose(&mut self, enabled: bool) -> Result<()> {
        self.config.verbose = enabled;
        self.config.save(&self.config_path).await
    }

    pub async fn reset(&mut self) -> Result<()> {
        let storage_dir = self.config.storage_dir.clone();
        self.config = AppConfig {
            storage_dir,
            ..AppConfig::default()
        };
        self.config.save(&self.config_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::create_temp_dir;

    #[test]
    fn test_endpoint_normalization() {
        let config = AppConfig {
            endpoint: "https://api.example.com".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.to_client_config().base_url, "https://api.example.com/api");

        let config = AppConfig {
            endpoint: "https://api.example.com/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.to_client_config().base_url, "https://api.example.com/api");

        let config = AppConfig {
            endpoint: "https://api.example.com/api".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.to_client_config().base_url, "https://api.example.com/api");
    }

    #[test]
    fn test_localhost_disables_proxy() {
        let config = AppConfig {
            endpoint: "http://localhost:5000".to_string(),
            ..AppConfig::default()
        };
        assert!(!config.to_client_config().use_proxy);

        let config = AppConfig {
            endpoint: "https://api.example.com".to_string(),
            ..AppConfig::default()
        };
        assert!(config.to_client_config().use_proxy);
    }

    #[test]
    fn test_endpoint_url_joins_paths() {
        let config = ClientConfigBuilder::new()
            .base_url("https://api.example.com/api/")
            .build()
            .unwrap();
        assert_eq!(
            config.endpoint_url("/users/login"),
            "https://api.example.com/api/users/login"
        );
    }

    #[test]
    fn test_builder_validates() {
        assert!(ClientConfigBuilder::new().build().is_err());
        assert!(ClientConfigBuilder::new().base_url("ftp://x").build().is_err());
        assert!(ClientConfigBuilder::new()
            .base_url("https://api.example.com")
            .timeout(0)
            .build()
            .is_err());
        assert!(ClientConfigBuilder::new()
            .base_url("https://api.example.com")
            .build()
            .is_ok());
    }

    #[tokio::test]
    async fn test_load_creates_default_config() {
        let dir = create_temp_dir();
        let path = dir.path().join("config.json");

        let config = AppConfig::load_from(&path).await.unwrap();
        assert_eq!(config.timeout, 30);
        assert!(path.exists());

        // Round-trips through the file
        let reloaded = AppConfig::load_from(&path).await.unwrap();
        assert_eq!(reloaded.timeout, config.timeout);
    }

    #[tokio::test]
    async fn test_load_recovers_from_corrupt_config() {
        let dir = create_temp_dir();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{broken").unwrap();

        let config = AppConfig::load_from(&path).await.unwrap();
        assert_eq!(config.timeout, 30);
    }
}

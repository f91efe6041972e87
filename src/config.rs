use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TriageError};

/// Fixed local backend port used when the host resolves to localhost
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:8002";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub inbox: InboxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_accepted_mime_types")]
    pub accepted_mime_types: Vec<String>,
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_mime_types: default_accepted_mime_types(),
            accepted_extensions: default_accepted_extensions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxConfig {
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            preview_limit: default_preview_limit(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_LOCAL_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_accepted_mime_types() -> Vec<String> {
    vec!["text/plain".to_string(), "application/pdf".to_string()]
}

fn default_accepted_extensions() -> Vec<String> {
    vec![".txt".to_string(), ".pdf".to_string()]
}

fn default_preview_limit() -> usize {
    5
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config with warning
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TriageError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| TriageError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TriageError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| TriageError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| TriageError::ConfigError(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(TriageError::ConfigError(
                "api.base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(TriageError::ConfigError(
                "api.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.api.request_timeout_secs > 300 {
            return Err(TriageError::ConfigError(
                "api.request_timeout_secs cannot exceed 300 (5 minutes)".to_string(),
            ));
        }

        if self.upload.accepted_mime_types.is_empty() {
            return Err(TriageError::ConfigError(
                "upload.accepted_mime_types cannot be empty".to_string(),
            ));
        }
        for ext in &self.upload.accepted_extensions {
            if !ext.starts_with('.') {
                return Err(TriageError::ConfigError(format!(
                    "upload.accepted_extensions entries must start with '.': '{}'",
                    ext
                )));
            }
        }
        if self.upload.accepted_extensions.is_empty() {
            return Err(TriageError::ConfigError(
                "upload.accepted_extensions cannot be empty".to_string(),
            ));
        }

        if self.inbox.preview_limit == 0 {
            return Err(TriageError::ConfigError(
                "inbox.preview_limit must be at least 1".to_string(),
            ));
        }
        if self.inbox.preview_limit > 50 {
            return Err(TriageError::ConfigError(
                "inbox.preview_limit cannot exceed 50".to_string(),
            ));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Create an example configuration file
    pub async fn create_example(path: &Path) -> Result<()> {
        let config = Self::default();
        config.save(path).await
    }

    /// Resolve the API base URL for a given host. A localhost host routes
    /// to the fixed local backend port; any other host routes to a relative
    /// `/api` prefix on that host.
    pub fn base_url_for_host(host: &str) -> String {
        match host {
            "localhost" | "127.0.0.1" => DEFAULT_LOCAL_BASE_URL.to_string(),
            other => format!("https://{}/api", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:8002");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(
            config.upload.accepted_mime_types,
            vec!["text/plain", "application/pdf"]
        );
        assert_eq!(config.upload.accepted_extensions, vec![".txt", ".pdf"]);
        assert_eq!(config.inbox.preview_limit, 5);
    }

    #[test]
    fn test_config_validation_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8002".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn test_config_validation_timeout_bounds() {
        let mut config = Config::default();

        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.api.request_timeout_secs = 1;
        assert!(config.validate().is_ok());

        config.api.request_timeout_secs = 300;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_extension_without_dot() {
        let mut config = Config::default();
        config.upload.accepted_extensions = vec!["txt".to_string()];
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("start with '.'"));
    }

    #[test]
    fn test_config_validation_empty_upload_lists() {
        let mut config = Config::default();
        config.upload.accepted_mime_types.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upload.accepted_extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_preview_limit_bounds() {
        let mut config = Config::default();

        config.inbox.preview_limit = 0;
        assert!(config.validate().is_err());

        config.inbox.preview_limit = 51;
        assert!(config.validate().is_err());

        config.inbox.preview_limit = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_for_host() {
        assert_eq!(
            Config::base_url_for_host("localhost"),
            "http://localhost:8002"
        );
        assert_eq!(
            Config::base_url_for_host("127.0.0.1"),
            "http://localhost:8002"
        );
        assert_eq!(
            Config::base_url_for_host("triage.example.com"),
            "https://triage.example.com/api"
        );
    }

    #[tokio::test]
    async fn test_config_load_save_roundtrip() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        let config = Config::default();
        config.save(path).await.unwrap();

        let loaded = Config::load(path).await.unwrap();

        assert_eq!(config.api.base_url, loaded.api.base_url);
        assert_eq!(
            config.api.request_timeout_secs,
            loaded.api.request_timeout_secs
        );
        assert_eq!(config.inbox.preview_limit, loaded.inbox.preview_limit);
    }

    #[tokio::test]
    async fn test_config_load_nonexistent_returns_default() {
        let path = Path::new("/tmp/nonexistent-mail-triage-config-12345.toml");

        let config = Config::load(path).await.unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8002");
        assert_eq!(config.inbox.preview_limit, 5);
    }

    #[tokio::test]
    async fn test_config_load_invalid_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        tokio::fs::write(path, "this is not valid toml {[}]")
            .await
            .unwrap();

        let result = Config::load(path).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file"));
    }

    #[tokio::test]
    async fn test_config_partial_with_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        let partial_config = r#"
[api]
base_url = "https://triage.example.com/api"

[inbox]
preview_limit = 10
"#;
        tokio::fs::write(path, partial_config).await.unwrap();

        let config = Config::load(path).await.unwrap();

        assert_eq!(config.api.base_url, "https://triage.example.com/api");
        assert_eq!(config.inbox.preview_limit, 10);

        // Defaults still fill the rest
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.upload.accepted_extensions, vec![".txt", ".pdf"]);
    }
}

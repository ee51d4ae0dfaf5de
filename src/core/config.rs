use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_PROVIDER_URL: &str = "https://api.exchangerate-api.com/v4/latest";

fn default_base_url() -> String {
    DEFAULT_PROVIDER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            base_currency: default_base_currency(),
            refresh_interval_secs: default_refresh_interval_secs(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or defaults if none exists yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "fxc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/latest"
  timeout_secs: 3
base_currency: "EUR"
refresh_interval_secs: 60
data_path: "/tmp/fxc"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/latest");
        assert_eq!(config.provider.timeout(), Duration::from_secs(3));
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.data_path().unwrap(), PathBuf::from("/tmp/fxc"));
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("data_path: ~").unwrap();
        assert_eq!(config.provider.base_url, DEFAULT_PROVIDER_URL);
        assert_eq!(config.provider.timeout_secs, 10);
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.refresh_interval_secs, 300);
        assert!(config.data_path.is_none());

        let partial: AppConfig = serde_yaml::from_str(
            r#"
provider:
  timeout_secs: 1
"#,
        )
        .unwrap();
        assert_eq!(partial.provider.base_url, DEFAULT_PROVIDER_URL);
        assert_eq!(partial.provider.timeout_secs, 1);
    }

    #[test]
    fn test_load_from_path_reports_missing_file() {
        let result = AppConfig::load_from_path("/definitely/not/here.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}

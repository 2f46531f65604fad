use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dns::ARVANCLOUD_API_ENDPOINT;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub plugin: PluginConfig,
    #[serde(default)]
    pub record: RecordConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seconds to wait after creating records before letting the CA validate
    #[serde(default = "default_propagation_seconds")]
    pub propagation_seconds: u64,
    #[serde(default = "default_credentials_path")]
    pub credentials: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    #[serde(default)]
    pub cloud: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_propagation_seconds() -> u64 {
    120
}

fn default_credentials_path() -> PathBuf {
    Settings::config_dir().join("credentials.toml")
}

fn default_ttl() -> u32 {
    120
}

fn default_endpoint() -> String {
    ARVANCLOUD_API_ENDPOINT.to_string()
}

impl Settings {
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(settings)
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        #[cfg(unix)]
        {
            PathBuf::from("/etc/arvancloud-dns")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\ProgramData\arvancloud-dns")
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            propagation_seconds: default_propagation_seconds(),
            credentials: default_credentials_path(),
        }
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            cloud: false,
            endpoint: default_endpoint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[plugin]
log_level = "debug"
propagation_seconds = 30
credentials = "/tmp/arvan.toml"

[record]
ttl = 60
cloud = true
"#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.plugin.log_level, "debug");
        assert_eq!(settings.plugin.propagation_seconds, 30);
        assert_eq!(settings.plugin.credentials, PathBuf::from("/tmp/arvan.toml"));
        assert_eq!(settings.record.ttl, 60);
        assert!(settings.record.cloud);
        assert_eq!(settings.record.endpoint, ARVANCLOUD_API_ENDPOINT);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.plugin.log_level, "info");
        assert_eq!(settings.plugin.propagation_seconds, 120);
        assert_eq!(settings.plugin.credentials, default_credentials_path());
        assert_eq!(settings.record.ttl, 120);
        assert!(!settings.record.cloud);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(&dir.path().join("config.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

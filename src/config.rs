//! Configuration handling for the CLI

use crate::catalog::UploadLimits;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding `simulated_delay_ms`
pub const DELAY_ENV_VAR: &str = "HUNTBOARD_SIMULATED_DELAY_MS";

const DEFAULT_DELAY_MS: u64 = 1500;
const DEFAULT_MAX_UPLOAD_MB: u64 = 5;
const DEFAULT_LOG_FILTER: &str = "huntboard=info";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HuntboardConfig {
    /// Delay of the simulated backend, in milliseconds
    pub simulated_delay_ms: Option<u64>,
    /// Size limit for uploaded files, in megabytes
    pub max_upload_mb: Option<u64>,
    /// Log filter used when RUST_LOG is unset
    pub log_filter: Option<String>,
}

impl HuntboardConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "huntboard", "huntboard")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                serde_json::from_str(&content)?
            }
            _ => Self::default(),
        };
        config.apply_env(std::env::var(DELAY_ENV_VAR).ok().as_deref());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    fn apply_env(&mut self, delay_ms: Option<&str>) {
        match delay_ms.map(|raw| raw.trim().parse::<u64>()) {
            Some(Ok(ms)) => self.simulated_delay_ms = Some(ms),
            Some(Err(err)) => {
                tracing::warn!(var = DELAY_ENV_VAR, %err, "ignoring invalid override")
            }
            None => {}
        }
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms.unwrap_or(DEFAULT_DELAY_MS))
    }

    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits::from_megabytes(self.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB))
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = HuntboardConfig::default();
        assert!(config.simulated_delay_ms.is_none());
        assert!(config.max_upload_mb.is_none());
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_defaults_resolve() {
        let config = HuntboardConfig::default();
        assert_eq!(config.simulated_delay(), Duration::from_millis(1500));
        assert_eq!(config.upload_limits(), UploadLimits::default());
        assert_eq!(config.log_filter(), "huntboard=info");
    }

    #[test]
    fn test_serialization() {
        let config = HuntboardConfig {
            simulated_delay_ms: Some(10),
            max_upload_mb: Some(2),
            log_filter: Some("huntboard=debug".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: HuntboardConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
        assert_eq!(parsed.upload_limits().max_file_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: HuntboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, HuntboardConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"max_upload_mb": 8, "theme": "dark"}"#;
        let parsed: HuntboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.max_upload_mb, Some(8));
    }

    #[test]
    fn test_env_override_wins() {
        let mut config = HuntboardConfig {
            simulated_delay_ms: Some(1500),
            ..Default::default()
        };
        config.apply_env(Some(" 25 "));
        assert_eq!(config.simulated_delay(), Duration::from_millis(25));
    }

    #[test]
    fn test_invalid_env_override_is_ignored() {
        let mut config = HuntboardConfig {
            simulated_delay_ms: Some(40),
            ..Default::default()
        };
        config.apply_env(Some("soon"));
        config.apply_env(None);
        assert_eq!(config.simulated_delay_ms, Some(40));
    }

    #[test]
    fn test_huge_upload_limit_does_not_overflow() {
        let config = HuntboardConfig {
            max_upload_mb: Some(u64::MAX),
            ..Default::default()
        };
        assert_eq!(config.upload_limits().max_file_bytes, u64::MAX);
    }

    #[test]
    fn test_config_path_returns_option() {
        let _path = HuntboardConfig::config_path();
    }
}

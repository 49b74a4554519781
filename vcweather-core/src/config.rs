use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, env, fs, path::PathBuf};

use crate::{request::DEFAULT_BASE_URL, validate::UnitGroup};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "VCWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// unit_group = "us"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,

    /// Override for the timeline endpoint, mostly useful against a mock server.
    pub base_url: Option<String>,

    /// Default unit group for requests, e.g. "metric" or "us".
    pub unit_group: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.unit_group_or_default()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "vcweather", "vcweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment if set, else from the file.
    pub fn api_key(&self) -> Option<String> {
        Self::api_key_from(env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    fn api_key_from(from_env: Option<String>, stored: Option<&str>) -> Option<String> {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| stored.filter(|key| !key.trim().is_empty()).map(str::to_owned))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn unit_group_or_default(&self) -> Result<UnitGroup> {
        match &self.unit_group {
            None => Ok(UnitGroup::default()),
            Some(unit) => UnitGroup::try_from(unit.as_str())
                .with_context(|| format!("Invalid unit_group '{unit}' in configuration")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.unit_group_or_default().unwrap(), UnitGroup::Metric);
    }

    #[test]
    fn env_key_takes_precedence_over_stored_key() {
        assert_eq!(
            Config::api_key_from(Some("ENV".into()), Some("FILE")),
            Some("ENV".to_string())
        );
        assert_eq!(Config::api_key_from(None, Some("FILE")), Some("FILE".to_string()));
        assert_eq!(Config::api_key_from(Some("  ".into()), Some("FILE")), Some("FILE".to_string()));
        assert_eq!(Config::api_key_from(None, Some("")), None);
        assert_eq!(Config::api_key_from(None, None), None);
    }

    #[test]
    fn parses_toml() {
        let cfg = Config::from_toml(
            r#"
            api_key = "KEY"
            base_url = "http://localhost:8080/timeline/"
            unit_group = "us"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.base_url(), "http://localhost:8080/timeline/");
        assert_eq!(cfg.unit_group_or_default().unwrap(), UnitGroup::Us);
    }

    #[test]
    fn rejects_unknown_unit_group() {
        let err = Config::from_toml(r#"unit_group = "imperial""#).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid unit_group 'imperial'"));
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.unit_group = Some("uk".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }
}

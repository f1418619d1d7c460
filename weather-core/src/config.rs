use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::DisplayUnit;

pub const DEFAULT_ENDPOINT: &str = "https://api.weatherapi.com/v1/forecast.json";
pub const DEFAULT_CITY: &str = "Rochester";

const API_KEY_ENV: &str = "WEATHER_API_KEY";
const ENDPOINT_ENV: &str = "WEATHER_API_ENDPOINT";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Rochester"
/// unit = "fahrenheit"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WeatherAPI.com key, sent as the `key` query parameter.
    pub api_key: Option<String>,

    /// Forecast endpoint; only overridden for testing or proxies.
    pub endpoint: String,

    /// City looked up automatically when an interactive session starts.
    pub default_city: String,

    /// Unit selected at session start.
    pub unit: DisplayUnit,

    /// Upper bound on a single forecast request.
    pub timeout_secs: u64,

    /// Delay before the automatic lookup of `default_city`.
    pub startup_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_city: DEFAULT_CITY.to_string(),
            unit: DisplayUnit::Celsius,
            timeout_secs: 10,
            startup_delay_ms: 500,
        }
    }
}

impl Config {
    /// Return the API key or a hint on how to configure it.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` or set {API_KEY_ENV}."
            )
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Apply `WEATHER_API_KEY` / `WEATHER_API_ENDPOINT` on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var(API_KEY_ENV).ok(), std::env::var(ENDPOINT_ENV).ok())
    }

    fn with_overrides(mut self, api_key: Option<String>, endpoint: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        self
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
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
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("weather configure"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config { api_key: Some("   ".into()), ..Config::default() };
        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml("api_key = \"KEY\"\nunit = \"fahrenheit\"\n")
            .expect("partial config must parse");

        assert_eq!(cfg.api_key().expect("key present"), "KEY");
        assert_eq!(cfg.unit, DisplayUnit::Fahrenheit);
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.default_city, DEFAULT_CITY);
        assert_eq!(cfg.startup_delay(), Duration::from_millis(500));
    }

    #[test]
    fn unknown_unit_in_toml_is_rejected() {
        assert!(Config::from_toml("unit = \"kelvin\"").is_err());
    }

    #[test]
    fn toml_roundtrip_preserves_values() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            default_city: "Oslo".into(),
            timeout_secs: 3,
            ..Config::default()
        };

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back = Config::from_toml(&text).expect("parse");

        assert_eq!(back.default_city, "Oslo");
        assert_eq!(back.timeout(), Duration::from_secs(3));
        assert_eq!(back.api_key().expect("key present"), "KEY");
    }

    #[test]
    fn overrides_replace_file_values() {
        let cfg = Config { api_key: Some("FILE".into()), ..Config::default() }
            .with_overrides(Some("ENV".into()), Some("http://localhost:9/forecast.json".into()));

        assert_eq!(cfg.api_key().expect("key present"), "ENV");
        assert_eq!(cfg.endpoint, "http://localhost:9/forecast.json");
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let cfg = Config { api_key: Some("FILE".into()), ..Config::default() }
            .with_overrides(Some(String::new()), None);

        assert_eq!(cfg.api_key().expect("key present"), "FILE");
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
    }
}

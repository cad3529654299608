//! Configuration for the todolist client

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the task backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// City shown when the location input is blank
    #[serde(default = "default_city")]
    pub default_city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long a notification stays up before it dismisses itself
    #[serde(default = "default_toast_delay_ms")]
    pub toast_delay_ms: u64,

    /// Clock line refresh interval
    #[serde(default = "default_clock_interval_secs")]
    pub clock_interval_secs: u64,

    /// Maximum description length accepted by the form
    #[serde(default = "default_description_max_len")]
    pub description_max_len: usize,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_city() -> String {
    "Johannesburg".to_string()
}

fn default_toast_delay_ms() -> u64 {
    4000
}

fn default_clock_interval_secs() -> u64 {
    60
}

fn default_description_max_len() -> usize {
    500
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_delay_ms: default_toast_delay_ms(),
            clock_interval_secs: default_clock_interval_secs(),
            description_max_len: default_description_max_len(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl UiConfig {
    pub fn toast_delay(&self) -> Duration {
        Duration::from_millis(self.toast_delay_ms)
    }

    pub fn clock_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic
        Duration::from_secs(self.clock_interval_secs.max(1))
    }
}

impl Config {
    /// Default config path
    pub fn default_path() -> Result<PathBuf> {
        // Check environment variable first
        if let Ok(env_path) = std::env::var("TODOLIST_CONFIG") {
            return Ok(PathBuf::from(env_path));
        }

        // Check for config in current directory
        let local = PathBuf::from("config.toml");
        if local.exists() {
            return Ok(local);
        }

        // Then check XDG config
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("todolist");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load config from specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        let with_comments = format!(
            "# todolist configuration\n\
             # base_url points at the task backend serving /add, /update, /remove, /stats and /weather\n\n\
             {}",
            content
        );

        std::fs::write(path, with_comments).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_use_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [backend]
            base_url = "http://tasks.local:8080"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.backend.base_url, "http://tasks.local:8080");
        assert_eq!(cfg.backend.timeout_secs, 10);
        assert_eq!(cfg.weather.default_city, "Johannesburg");
        assert_eq!(cfg.ui.toast_delay(), Duration::from_millis(4000));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.weather.default_city = "Lisbon".to_string();
        cfg.ui.description_max_len = 120;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn clock_interval_never_zero() {
        let mut ui = UiConfig::default();
        ui.clock_interval_secs = 0;
        assert_eq!(ui.clock_interval(), Duration::from_secs(1));
    }
}

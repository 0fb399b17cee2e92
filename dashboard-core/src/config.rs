use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Environment variable that overrides the stored quote API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Quote generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Without a key the quote widget only serves local quotes.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_attempts: u32,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_attempts: crate::backoff::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub default_city: String,
    pub latency_ms: u64,
    /// Probability in `[0, 1]` that a simulated lookup fails.
    pub failure_rate: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            default_city: "London, UK".to_string(),
            latency_ms: 100,
            failure_rate: 0.1,
        }
    }
}

impl WeatherConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Amount in INR converted when the widget mounts.
    pub default_amount: String,
    pub latency_ms: u64,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            default_amount: "1000".to_string(),
            latency_ms: 1000,
        }
    }
}

impl CurrencyConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [quote]
/// api_key = "..."
///
/// [weather]
/// default_city = "Pune, IN"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub quote: QuoteConfig,
    pub weather: WeatherConfig,
    pub currency: CurrencyConfig,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
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
        let dirs = ProjectDirs::from("dev", "dashboard", "dashboard-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        let trimmed = api_key.trim();
        self.quote.api_key = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Effective API key: the environment wins over the stored value, and
    /// blank values count as absent.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                self.quote
                    .api_key
                    .clone()
                    .filter(|key| !key.trim().is_empty())
            })
            .map(|key| key.trim().to_string())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

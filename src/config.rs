use crate::feeds::DEFAULT_QUERY;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-3-flash-preview".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_query: String,
    pub refresh_interval_secs: u64,
    pub quick_filters: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_query: DEFAULT_QUERY.to_string(),
            refresh_interval_secs: 15 * 60,
            quick_filters: [
                "Critical Breaches",
                "0-Day Advisories",
                "Ransomware Trends",
                "Global Policy",
                "Semiconductor Supply",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

impl Config {
    /// `~/.config/cybershield/config.toml` (or the platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cybershield").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    /// A missing default file is not an error; an explicitly named one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Config::default(),
            },
        };

        if config.gemini.api_key.trim().is_empty() {
            config.gemini.api_key = api_key_from_env(|name| std::env::var(name).ok());
        }
        if config.dashboard.default_query.trim().is_empty() {
            config.dashboard.default_query = DEFAULT_QUERY.to_string();
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// First non-empty value among [`API_KEY_ENV_VARS`]. Absence is left for the service to reject.
fn api_key_from_env(lookup: impl Fn(&str) -> Option<String>) -> String {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default()
}

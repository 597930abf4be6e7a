//! TOML-based application configuration.
//!
//! Stores:
//! - Tracking cadence (poll interval, sampling window)
//! - Generation API settings (endpoint, model, temperature, timeout)
//! - Classification sets (distraction/focus app lists)
//! - Stats thresholds (streak minimum)
//!
//! Configuration is stored at `~/.config/focusflow/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::classify::{ClassificationSets, DEFAULT_DISTRACTION_APPS, DEFAULT_FOCUS_APPS};
use crate::error::ConfigError;
use crate::generation::DEFAULT_ENDPOINT;

/// Tracking-loop cadence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Seconds between poll cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Trailing usage window the sampler inspects, in seconds.
    #[serde(default = "default_sample_window")]
    pub sample_window_secs: u64,
}

/// Generation API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Hard bound on one generation call, in seconds.
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
    /// Environment variable the API key is read from.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Classification set configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    #[serde(default = "default_distraction_apps")]
    pub distraction_apps: Vec<String>,
    #[serde(default = "default_focus_apps")]
    pub focus_apps: Vec<String>,
}

/// Stats thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Minimum focus seconds in a day for it to count toward the streak.
    #[serde(default = "default_streak_min")]
    pub streak_min_daily_focus_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/focusflow"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load configuration from the default location. A missing file yields
    /// the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save configuration to the default location.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Build the classification sets from config, rejecting overlap.
    pub fn classification_sets(&self) -> Result<ClassificationSets, ConfigError> {
        ClassificationSets::new(
            self.classification.distraction_apps.iter().cloned(),
            self.classification.focus_apps.iter().cloned(),
        )
    }

    /// Read the generation API key from the configured environment
    /// variable. Empty values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.generation.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            sample_window_secs: default_sample_window(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_generation_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            distraction_apps: default_distraction_apps(),
            focus_apps: default_focus_apps(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            streak_min_daily_focus_secs: default_streak_min(),
        }
    }
}

fn default_poll_interval() -> u64 {
    6
}

fn default_sample_window() -> u64 {
    10
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    "mixtral-8x7b-32768".to_string()
}

fn default_temperature() -> f64 {
    0.9
}

fn default_generation_timeout() -> u64 {
    10
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_distraction_apps() -> Vec<String> {
    DEFAULT_DISTRACTION_APPS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_focus_apps() -> Vec<String> {
    DEFAULT_FOCUS_APPS.iter().map(|s| s.to_string()).collect()
}

fn default_streak_min() -> u64 {
    600
}

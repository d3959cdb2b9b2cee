use anyhow::{Context, Result, anyhow};
use chrono::Duration;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{provider::ProviderId, trend::TrendDisplayList, units::PrecipitationUnit};

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional default provider id, e.g. "accu" or "metie".
    pub default_provider: Option<String>,

    /// Language requested from providers that localize their texts.
    pub language: String,

    pub precipitation_unit: PrecipitationUnit,

    /// How long fetched weather stays fresh before it is refreshed.
    pub polling_interval_hours: f64,

    pub hourly_trend_display: TrendDisplayList,

    /// Example TOML:
    /// [providers.accu]
    /// api_key = "..."
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: None,
            language: "en".to_string(),
            precipitation_unit: PrecipitationUnit::default(),
            polling_interval_hours: 1.5,
            hourly_trend_display: TrendDisplayList::default(),
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow!(
                "No default provider configured.\n\
                 Hint: run `skycast configure <provider>` (e.g. `skycast configure accu`) first."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Polling interval, clamped to at most a year.
    pub fn polling_interval(&self) -> Duration {
        let hours = self.polling_interval_hours.clamp(0.0, MAX_POLLING_INTERVAL_HOURS);
        Duration::milliseconds((hours * 3_600_000.0) as i64)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        let hours = self.polling_interval_hours;
        if !hours.is_finite() || hours <= 0.0 {
            return Err(anyhow!(
                "polling_interval_hours must be a positive number of hours, got {hours}"
            ));
        }
        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Set/replace a provider API key; the first configured provider becomes the default.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// API key for a provider: config file first, then `SKYCAST_<ID>_KEY`.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<String> {
        self.provider_api_key_with(provider_id, |name| std::env::var(name).ok())
    }

    /// Like [`Config::provider_api_key`], reading variables through `env`.
    pub fn provider_api_key_with(
        &self,
        provider_id: ProviderId,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        self.providers
            .get(provider_id.as_str())
            .map(|cfg| cfg.api_key.clone())
            .filter(|key| !key.is_empty())
            .or_else(|| env(&provider_id.env_key()).filter(|key| !key.is_empty()))
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        !provider_id.requires_api_key() || self.provider_api_key(provider_id).is_some()
    }
}

const MAX_POLLING_INTERVAL_HOURS: f64 = 24.0 * 365.0;

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "skycast", "skycast")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

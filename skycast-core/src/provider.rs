use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{convert::TryFrom, fmt::Debug};

use crate::{
    Config,
    model::{Alert, Location, LocationQuery, Weather},
    provider::accu::AccuProvider,
};

pub mod accu;
#[cfg(feature = "metie")]
pub mod metie;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Accu,
    MetIe,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Accu => "accu",
            ProviderId::MetIe => "metie",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Accu => "AccuWeather",
            ProviderId::MetIe => "Met Éireann",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Accu, ProviderId::MetIe]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::Accu)
    }

    /// Environment variable consulted when the config file has no key.
    pub fn env_key(&self) -> String {
        format!("SKYCAST_{}_KEY", self.as_str().to_uppercase())
    }

    /// Whether this build was compiled with the provider.
    pub fn is_available(&self) -> bool {
        match self {
            ProviderId::Accu => true,
            ProviderId::MetIe => cfg!(feature = "metie"),
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "accu" => Ok(ProviderId::Accu),
            "metie" => Ok(ProviderId::MetIe),
            _ => Err(anyhow!("Unknown provider '{value}'. Supported providers: accu, metie.")),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    /// Whether the provider covers a raw coordinate. Checked before geocoding.
    fn supports_coordinates(&self, _latitude: f64, _longitude: f64) -> bool {
        true
    }

    /// Whether the provider covers a resolved location.
    fn supports_location(&self, location: &Location) -> bool {
        self.supports_coordinates(location.latitude, location.longitude)
    }

    /// Resolve a coordinate into a provider location.
    async fn request_location(&self, query: &LocationQuery) -> Result<Location>;

    /// Fetch and convert the full forecast. `now` stamps the result's update time.
    async fn get_weather(&self, location: &Location, now: DateTime<Utc>) -> Result<Weather>;

    /// Fetch alerts only. `None` means the provider returned no alert data.
    async fn get_alerts(&self, location: &Location) -> Result<Option<Vec<Alert>>>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    provider_from_config_with(id, config, |name| std::env::var(name).ok())
}

/// Like [`provider_from_config`], reading key variables through `env`.
pub fn provider_from_config_with(
    id: ProviderId,
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    if !id.is_available() {
        return Err(anyhow!(
            "Provider '{id}' is not available in this build (enable the `{id}` feature)."
        ));
    }

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::Accu => {
            let api_key = config.provider_api_key_with(id, env).ok_or_else(|| {
                anyhow!(
                    "No API key configured for provider '{id}'.\n\
                     Hint: run `skycast configure {id}` and enter your API key."
                )
            })?;
            Box::new(AccuProvider::new(
                api_key,
                config.language.clone(),
                config.precipitation_unit,
            ))
        }
        #[cfg(feature = "metie")]
        ProviderId::MetIe => Box::new(metie::MetIeProvider::new()),
        #[cfg(not(feature = "metie"))]
        ProviderId::MetIe => unreachable!("availability checked above"),
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

/// Send a request and decode a JSON body, failing on non-success status.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    what: &str,
) -> Result<T> {
    let res = request
        .send()
        .await
        .with_context(|| format!("Failed to send request to {what}"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body)
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    model::{Alert, Location, LocationQuery, Weather},
    provider::fetch_json,
};

use super::{ProviderId, WeatherProvider};

pub mod convert;
pub mod json;

use json::{MetIeHourly, MetIeLocationResult, MetIeWarningResult};

const BASE_URL: &str = "https://prodapi.metweb.ie";

/// Rough bounding box of the island of Ireland.
const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = 51.2..=55.5;
const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -11.0..=-5.3;

/// Met Éireann, the Irish national service. Keyless, Ireland only.
#[derive(Debug, Clone)]
pub struct MetIeProvider {
    base_url: String,
    http: Client,
}

impl Default for MetIeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetIeProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        fetch_json(self.http.get(url), what).await
    }

    async fn fetch_hourly(&self, location: &Location) -> Result<Vec<MetIeHourly>> {
        self.get(
            &format!("weather/details/{}/{}", location.latitude, location.longitude),
            "Met Éireann (forecast)",
        )
        .await
    }

    async fn fetch_warnings(&self) -> Result<MetIeWarningResult> {
        self.get("warnings/active", "Met Éireann (warnings)").await
    }
}

#[async_trait]
impl WeatherProvider for MetIeProvider {
    fn id(&self) -> ProviderId {
        ProviderId::MetIe
    }

    fn supports_coordinates(&self, latitude: f64, longitude: f64) -> bool {
        LATITUDE_RANGE.contains(&latitude) && LONGITUDE_RANGE.contains(&longitude)
    }

    fn supports_location(&self, location: &Location) -> bool {
        location.country_code.as_deref().is_some_and(|c| c.eq_ignore_ascii_case("IE"))
            || self.supports_coordinates(location.latitude, location.longitude)
    }

    #[instrument(skip(self), fields(lat = query.latitude, lon = query.longitude))]
    async fn request_location(&self, query: &LocationQuery) -> Result<Location> {
        let result: MetIeLocationResult = self
            .get(
                &format!("location/reverse/{}/{}", query.latitude, query.longitude),
                "Met Éireann (reverse geocoding)",
            )
            .await?;

        debug!(city = ?result.city, county = ?result.county, "resolved Met Éireann location");
        let bare = Location::from_coordinates(query.latitude, query.longitude, ProviderId::MetIe);
        let mut location = convert::convert_location(&bare, &result);
        if let Some(zip) = &query.zip_code {
            location.city = format!("{} ({zip})", location.city);
        }
        Ok(location)
    }

    #[instrument(skip(self, location), fields(location = %location.formatted_id()))]
    async fn get_weather(&self, location: &Location, now: DateTime<Utc>) -> Result<Weather> {
        let (hourly, warnings) = tokio::join!(self.fetch_hourly(location), self.fetch_warnings());

        let hourly = hourly?;
        let warnings = warnings
            .inspect_err(|err| warn!(error = %err, "Met Éireann warnings unavailable"))
            .ok();

        let weather =
            convert::convert_weather(Some(hourly.as_slice()), warnings.as_ref(), location, now)
                .context("Failed to convert Met Éireann response")?;
        Ok(weather)
    }

    #[instrument(skip(self, location), fields(location = %location.formatted_id()))]
    async fn get_alerts(&self, location: &Location) -> Result<Option<Vec<Alert>>> {
        let warnings = self.fetch_warnings().await?;
        Ok(convert::convert_secondary(Some(&warnings), location))
    }
}

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    model::{Alert, Location, LocationQuery, Weather},
    provider::fetch_json,
    units::PrecipitationUnit,
};

use super::{ProviderId, WeatherProvider};

pub mod convert;
pub mod json;

use convert::AccuResponses;
use json::{
    AccuAirQualityResult, AccuAlertResult, AccuCurrentResult, AccuForecastDailyResult,
    AccuForecastHourlyResult, AccuLocationResult, AccuMinutelyResult,
};

const BASE_URL: &str = "https://dataservice.accuweather.com";

#[derive(Debug, Clone)]
pub struct AccuProvider {
    api_key: String,
    language: String,
    unit: PrecipitationUnit,
    base_url: String,
    http: Client,
}

impl AccuProvider {
    pub fn new(api_key: String, language: String, unit: PrecipitationUnit) -> Self {
        Self::with_base_url(api_key, language, unit, BASE_URL)
    }

    pub fn with_base_url(
        api_key: String,
        language: String,
        unit: PrecipitationUnit,
        base_url: impl Into<String>,
    ) -> Self {
        Self { api_key, language, unit, base_url: base_url.into(), http: Client::new() }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let request = self
            .http
            .get(url)
            .query(&[("apikey", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(extra);

        fetch_json(request, what).await
    }

    async fn fetch_current(&self, key: &str) -> Result<AccuCurrentResult> {
        let results: Vec<AccuCurrentResult> = self
            .get(
                &format!("currentconditions/v1/{key}"),
                &[("details", "true")],
                "AccuWeather (current conditions)",
            )
            .await?;

        results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("AccuWeather current conditions response contained no data"))
    }

    async fn fetch_daily(&self, key: &str) -> Result<AccuForecastDailyResult> {
        self.get(
            &format!("forecasts/v1/daily/15day/{key}"),
            &[("details", "true"), ("metric", "true")],
            "AccuWeather (daily forecast)",
        )
        .await
    }

    async fn fetch_hourly(&self, key: &str) -> Result<Vec<AccuForecastHourlyResult>> {
        self.get(
            &format!("forecasts/v1/hourly/72hour/{key}"),
            &[("details", "true"), ("metric", "true")],
            "AccuWeather (hourly forecast)",
        )
        .await
    }

    async fn fetch_minutely(&self, location: &Location) -> Result<AccuMinutelyResult> {
        let q = format!("{},{}", location.latitude, location.longitude);
        self.get("forecasts/v1/minute", &[("q", q.as_str())], "AccuWeather (minute cast)")
            .await
    }

    async fn fetch_alerts(&self, key: &str) -> Result<Vec<AccuAlertResult>> {
        self.get(&format!("alerts/v1/{key}"), &[("details", "true")], "AccuWeather (alerts)")
            .await
    }

    async fn fetch_air_quality(&self, key: &str) -> Result<AccuAirQualityResult> {
        self.get(
            &format!("airquality/v2/forecasts/hourly/72hour/{key}"),
            &[],
            "AccuWeather (air quality)",
        )
        .await
    }
}

fn location_key(location: &Location) -> Result<&str> {
    location
        .city_id
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| anyhow!("Location has no AccuWeather key; resolve it with AccuWeather first"))
}

/// Optional endpoints are not available on every plan; a failure means "no data".
fn optional<T>(result: Result<T>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(endpoint = what, error = %err, "optional AccuWeather endpoint failed");
            None
        }
    }
}

#[async_trait]
impl WeatherProvider for AccuProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Accu
    }

    #[instrument(skip(self), fields(lat = query.latitude, lon = query.longitude))]
    async fn request_location(&self, query: &LocationQuery) -> Result<Location> {
        let q = format!("{},{}", query.latitude, query.longitude);
        let result: AccuLocationResult = self
            .get(
                "locations/v1/cities/geoposition/search",
                &[("q", q.as_str())],
                "AccuWeather (geoposition search)",
            )
            .await?;

        debug!(key = %result.key, name = %result.localized_name, "resolved AccuWeather location");
        Ok(convert::convert_location(None, &result, query.zip_code.as_deref()))
    }

    #[instrument(skip(self, location), fields(location = %location.formatted_id()))]
    async fn get_weather(&self, location: &Location, now: DateTime<Utc>) -> Result<Weather> {
        let key = location_key(location)?;

        let (current, daily, hourly, minutely, alerts, air_quality) = tokio::join!(
            self.fetch_current(key),
            self.fetch_daily(key),
            self.fetch_hourly(key),
            self.fetch_minutely(location),
            self.fetch_alerts(key),
            self.fetch_air_quality(key),
        );

        let responses = AccuResponses {
            current: current?,
            daily: daily?,
            hourly: hourly?,
            minutely: optional(minutely, "minute cast"),
            alerts: optional(alerts, "alerts").unwrap_or_default(),
            air_quality: optional(air_quality, "air quality").unwrap_or_default(),
        };

        let weather = convert::convert_weather(location, &responses, self.unit, now)
            .context("Failed to convert AccuWeather response")?;
        Ok(weather)
    }

    #[instrument(skip(self, location), fields(location = %location.formatted_id()))]
    async fn get_alerts(&self, location: &Location) -> Result<Option<Vec<Alert>>> {
        let key = location_key(location)?;
        let alerts = self.fetch_alerts(key).await?;
        Ok(Some(convert::alert_list(&alerts)))
    }
}

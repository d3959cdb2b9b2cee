use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One row of the hourly forecast. Several numeric fields arrive as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetIeHourly {
    /// `yyyy-MM-dd`, Irish local time.
    pub date: String,
    /// `HH:mm`, Irish local time.
    pub time: String,
    pub weather_number: Option<String>,
    pub weather_description: Option<String>,
    pub temperature: Option<f64>,
    pub rainfall: Option<String>,
    pub wind_direction: Option<String>,
    /// km/h
    pub wind_speed: Option<f64>,
    pub humidity: Option<String>,
    pub pressure: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetIeLocationResult {
    pub city: Option<String>,
    pub county: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetIeWarningResult {
    pub warnings: Option<MetIeWarnings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetIeWarnings {
    pub national: Option<Vec<MetIeWarning>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetIeWarning {
    pub id: String,
    #[serde(default)]
    pub regions: Vec<String>,
    pub onset: Option<DateTime<Utc>>,
    pub expiry: Option<DateTime<Utc>>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub level: Option<String>,
}

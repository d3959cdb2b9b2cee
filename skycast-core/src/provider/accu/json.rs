//! AccuWeather response shapes. Everything the API may omit is optional.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuLocationResult {
    pub key: String,
    pub localized_name: String,
    pub country: AccuRegion,
    pub administrative_area: Option<AccuRegion>,
    pub time_zone: AccuTimeZone,
    pub geo_position: AccuGeoPosition,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuRegion {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    pub localized_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuTimeZone {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuGeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// `{ "Value": 12.3, "Unit": "C" }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuValue {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

/// Current conditions report values in both systems.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuUnits {
    pub metric: Option<AccuValue>,
}

impl AccuUnits {
    pub fn metric_value(&self) -> Option<f64> {
        self.metric.as_ref()?.value
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuWindDirection {
    pub degrees: Option<f64>,
    pub localized: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuCurrentWind {
    pub direction: Option<AccuWindDirection>,
    pub speed: Option<AccuUnits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuForecastWind {
    pub direction: Option<AccuWindDirection>,
    pub speed: Option<AccuValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuCurrentResult {
    pub epoch_time: i64,
    pub weather_text: Option<String>,
    pub weather_icon: Option<i32>,
    pub temperature: Option<AccuUnits>,
    pub real_feel_temperature: Option<AccuUnits>,
    pub real_feel_temperature_shade: Option<AccuUnits>,
    pub apparent_temperature: Option<AccuUnits>,
    pub wind_chill_temperature: Option<AccuUnits>,
    pub wet_bulb_temperature: Option<AccuUnits>,
    pub relative_humidity: Option<f64>,
    pub dew_point: Option<AccuUnits>,
    pub wind: Option<AccuCurrentWind>,
    #[serde(rename = "UVIndex")]
    pub uv_index: Option<f64>,
    #[serde(rename = "UVIndexText")]
    pub uv_index_text: Option<String>,
    pub visibility: Option<AccuUnits>,
    pub cloud_cover: Option<i32>,
    pub ceiling: Option<AccuUnits>,
    pub pressure: Option<AccuUnits>,
    pub temperature_summary: Option<AccuTemperatureSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuTemperatureSummary {
    pub past24_hour_range: Option<AccuUnitsRange>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuUnitsRange {
    pub minimum: Option<AccuUnits>,
    pub maximum: Option<AccuUnits>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuForecastDailyResult {
    pub headline: Option<AccuHeadline>,
    pub daily_forecasts: Option<Vec<AccuForecastDailyForecast>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuHeadline {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuValueRange {
    pub minimum: Option<AccuValue>,
    pub maximum: Option<AccuValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuForecastDailyForecast {
    pub epoch_date: i64,
    pub sun: Option<AccuAstro>,
    pub moon: Option<AccuMoon>,
    pub temperature: Option<AccuValueRange>,
    pub real_feel_temperature: Option<AccuValueRange>,
    pub real_feel_temperature_shade: Option<AccuValueRange>,
    pub hours_of_sun: Option<f64>,
    pub degree_day_summary: Option<AccuDegreeDaySummary>,
    pub air_and_pollen: Option<Vec<AccuAirAndPollen>>,
    pub day: Option<AccuHalfDay>,
    pub night: Option<AccuHalfDay>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuAstro {
    pub epoch_rise: Option<i64>,
    pub epoch_set: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuMoon {
    pub epoch_rise: Option<i64>,
    pub epoch_set: Option<i64>,
    pub phase: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuDegreeDaySummary {
    pub heating: Option<AccuValue>,
    pub cooling: Option<AccuValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuAirAndPollen {
    pub name: String,
    pub value: Option<i32>,
    pub category: Option<String>,
    pub category_value: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuHalfDay {
    pub icon: Option<i32>,
    pub short_phrase: Option<String>,
    pub long_phrase: Option<String>,
    pub precipitation_probability: Option<f64>,
    pub thunderstorm_probability: Option<f64>,
    pub rain_probability: Option<f64>,
    pub snow_probability: Option<f64>,
    pub ice_probability: Option<f64>,
    pub wind: Option<AccuForecastWind>,
    pub total_liquid: Option<AccuValue>,
    pub rain: Option<AccuValue>,
    pub snow: Option<AccuValue>,
    pub ice: Option<AccuValue>,
    pub hours_of_precipitation: Option<f64>,
    pub hours_of_rain: Option<f64>,
    pub hours_of_snow: Option<f64>,
    pub hours_of_ice: Option<f64>,
    pub cloud_cover: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuForecastHourlyResult {
    pub epoch_date_time: i64,
    pub weather_icon: Option<i32>,
    pub icon_phrase: Option<String>,
    #[serde(default = "default_true")]
    pub is_daylight: bool,
    pub temperature: Option<AccuValue>,
    pub real_feel_temperature: Option<AccuValue>,
    pub real_feel_temperature_shade: Option<AccuValue>,
    pub wet_bulb_temperature: Option<AccuValue>,
    pub wind: Option<AccuForecastWind>,
    pub relative_humidity: Option<f64>,
    #[serde(rename = "UVIndex")]
    pub uv_index: Option<f64>,
    #[serde(rename = "UVIndexText")]
    pub uv_index_text: Option<String>,
    pub precipitation_probability: Option<f64>,
    pub thunderstorm_probability: Option<f64>,
    pub rain_probability: Option<f64>,
    pub snow_probability: Option<f64>,
    pub ice_probability: Option<f64>,
    pub total_liquid: Option<AccuValue>,
    pub rain: Option<AccuValue>,
    pub snow: Option<AccuValue>,
    pub ice: Option<AccuValue>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuMinutelyResult {
    pub summary: Option<AccuMinutelySummary>,
    pub intervals: Option<Vec<AccuMinutelyInterval>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuMinutelySummary {
    pub long_phrase: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuMinutelyInterval {
    /// Milliseconds since the epoch.
    pub start_epoch_date_time: i64,
    pub minute: i32,
    pub dbz: f64,
    pub short_phrase: Option<String>,
    pub icon_code: Option<i32>,
    pub cloud_cover: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuAlertResult {
    #[serde(rename = "AlertID")]
    pub alert_id: i64,
    pub description: Option<AccuAlertDescription>,
    pub priority: Option<i32>,
    #[serde(rename = "TypeID")]
    pub type_id: Option<String>,
    pub color: Option<AccuAlertColor>,
    pub area: Option<Vec<AccuAlertArea>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuAlertDescription {
    pub localized: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuAlertColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccuAlertArea {
    pub epoch_start_time: i64,
    pub epoch_end_time: Option<i64>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccuAirQualityResult {
    pub data: Option<Vec<AccuAirQualityData>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuAirQualityData {
    pub epoch_date: i64,
    pub pollutants: Option<Vec<AccuAirQualityPollutant>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccuAirQualityPollutant {
    #[serde(rename = "type")]
    pub kind: String,
    pub concentration: AccuAirQualityConcentration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccuAirQualityConcentration {
    pub value: Option<f64>,
}

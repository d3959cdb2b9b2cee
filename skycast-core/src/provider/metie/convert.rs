//! Met Éireann payloads → domain model.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use super::json::{MetIeHourly, MetIeLocationResult, MetIeWarning, MetIeWarningResult};
use crate::{
    aggregate::{daily_precipitation_total, daily_temperature_range, local_midnight},
    error::ConvertError,
    model::{
        Alert, AlertSeverity, Base, Daily, Hourly, Location, Precipitation, Rgb, Temperature,
        Weather, WeatherCode, Wind,
    },
    units::{beaufort_level, kmh_to_ms},
};

pub const TIME_ZONE: Tz = chrono_tz::Europe::Dublin;

/// Warning region that covers the whole country.
const NATIONAL_REGION: &str = "EI0";

/// County → warning region code.
const REGIONS: &[(&str, &str)] = &[
    ("Carlow", "EI01"),
    ("Cavan", "EI02"),
    ("Clare", "EI03"),
    ("Cork", "EI04"),
    ("Donegal", "EI06"),
    ("Dublin", "EI07"),
    ("Galway", "EI10"),
    ("Kerry", "EI11"),
    ("Kildare", "EI12"),
    ("Kilkenny", "EI13"),
    ("Leitrim", "EI14"),
    ("Laois", "EI15"),
    ("Limerick", "EI16"),
    ("Longford", "EI18"),
    ("Louth", "EI19"),
    ("Mayo", "EI20"),
    ("Meath", "EI21"),
    ("Monaghan", "EI22"),
    ("Offaly", "EI23"),
    ("Roscommon", "EI24"),
    ("Sligo", "EI25"),
    ("Tipperary", "EI26"),
    ("Waterford", "EI27"),
    ("Westmeath", "EI29"),
    ("Wexford", "EI30"),
    ("Wicklow", "EI31"),
];

pub fn region_code(county: &str) -> Option<&'static str> {
    REGIONS.iter().find(|(name, _)| *name == county).map(|(_, code)| *code)
}

/// Only a result that names a county is taken as proof the point is in Ireland.
pub fn convert_location(location: &Location, result: &MetIeLocationResult) -> Location {
    let irish = result.county.is_some();
    Location {
        time_zone: TIME_ZONE,
        country: if irish { "Ireland".to_string() } else { location.country.clone() },
        country_code: if irish { Some("IE".to_string()) } else { location.country_code.clone() },
        province: result.county.clone(),
        city: result.city.clone().unwrap_or_default(),
        ..location.clone()
    }
}

/// Build the weather for `location` from the hourly forecast and warnings.
///
/// Met Éireann only publishes hourly data; daily entries are derived from it.
pub fn convert_weather(
    hourly_result: Option<&[MetIeHourly]>,
    warnings: Option<&MetIeWarningResult>,
    location: &Location,
    now: DateTime<Utc>,
) -> Result<Weather, ConvertError> {
    let hourly_result = match hourly_result {
        Some(hourly) if !hourly.is_empty() => hourly,
        _ => return Err(ConvertError::InvalidOrIncompleteData),
    };

    let hourly_forecast = hourly_list(hourly_result)?;
    let daily_forecast = daily_list(hourly_result, &hourly_forecast, location.time_zone);

    Ok(Weather {
        base: Base { city_id: location.city_id.clone(), publish_date: now, update_date: now },
        current: None,
        yesterday: None,
        daily_forecast,
        hourly_forecast,
        minutely_forecast: Vec::new(),
        alert_list: alert_list(location, national_warnings(warnings)).unwrap_or_default(),
    })
}

/// Alerts only, for refreshing warnings between full updates.
pub fn convert_secondary(
    warnings: Option<&MetIeWarningResult>,
    location: &Location,
) -> Option<Vec<Alert>> {
    alert_list(location, national_warnings(warnings))
}

fn national_warnings(warnings: Option<&MetIeWarningResult>) -> Option<&[MetIeWarning]> {
    warnings?.warnings.as_ref()?.national.as_deref()
}

/// One daily entry per provider date, in provider order, without the trailing partial day.
fn daily_list(hourly_result: &[MetIeHourly], hourly: &[Hourly], tz: Tz) -> Vec<Daily> {
    let mut days: Vec<(&str, Vec<&Hourly>)> = Vec::new();
    for (raw, converted) in hourly_result.iter().zip(hourly) {
        match days.iter_mut().find(|(date, _)| *date == raw.date) {
            Some((_, hours)) => hours.push(converted),
            None => days.push((raw.date.as_str(), vec![converted])),
        }
    }
    days.pop();

    days.into_iter()
        .filter_map(|(date, hours)| {
            let day_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|d| local_midnight(d, tz));
            let Some(day_date) = day_date else {
                debug!(date, "skipping Met Éireann day with unparsable date");
                return None;
            };

            let mut daily = Daily::new(day_date);
            if let Some((max, min)) = daily_temperature_range(&hours) {
                daily.day.temperature = Temperature::of(Some(max));
                daily.night.temperature = Temperature::of(Some(min));
            }
            daily.day.precipitation.total = daily_precipitation_total(&hours);
            Some(daily)
        })
        .collect()
}

fn hourly_list(hourly_result: &[MetIeHourly]) -> Result<Vec<Hourly>, ConvertError> {
    hourly_result
        .iter()
        .map(|result| {
            let raw_date = format!("{} {}", result.date, result.time);
            let date = NaiveDateTime::parse_from_str(&raw_date, "%Y-%m-%d %H:%M")
                .ok()
                .and_then(|local| local.and_local_timezone(TIME_ZONE).earliest())
                .ok_or_else(|| ConvertError::invalid_date(raw_date.clone()))?
                .with_timezone(&Utc);

            let speed = result.wind_speed.map(kmh_to_ms);
            let mut hourly = Hourly::new(date);
            hourly.is_daylight = !result.weather_number.as_deref().is_some_and(|n| n.ends_with('n'));
            hourly.weather_code = result.weather_number.as_deref().and_then(weather_code);
            hourly.weather_text = result.weather_description.clone();
            hourly.temperature = Temperature::of(result.temperature);
            hourly.precipitation =
                Precipitation { total: lenient(result.rainfall.as_deref()), ..Default::default() };
            hourly.wind = Wind {
                direction: None,
                degree: lenient(result.wind_direction.as_deref()),
                speed,
                level: speed.map(beaufort_level),
            };
            hourly.relative_humidity = lenient(result.humidity.as_deref());
            hourly.pressure = lenient(result.pressure.as_deref());
            Ok(hourly)
        })
        .collect()
}

fn lenient(value: Option<&str>) -> Option<f64> {
    value?.trim().parse().ok()
}

/// Warnings for the whole country plus those for the location's county.
///
/// `None` when the provider sent no warning list at all.
pub fn alert_list(location: &Location, warnings: Option<&[MetIeWarning]>) -> Option<Vec<Alert>> {
    let warnings = warnings?;
    if warnings.is_empty() {
        return Some(Vec::new());
    }

    let region = location
        .province
        .as_deref()
        .filter(|province| region_code(province).is_some())
        .or_else(|| location.parameter("metie", "region"));
    let region_code = region.and_then(region_code);

    let alerts = warnings
        .iter()
        .filter(|w| {
            w.regions.iter().any(|r| r == NATIONAL_REGION || Some(r.as_str()) == region_code)
        })
        .map(|w| Alert {
            alert_id: w.id.clone(),
            start_date: w.onset,
            end_date: w.expiry,
            headline: w.headline.clone(),
            description: w.description.clone(),
            content: None,
            alert_type: None,
            priority: None,
            severity: AlertSeverity::from_cap(w.severity.as_deref()),
            color: level_color(w.level.as_deref()),
        })
        .collect();

    Some(alerts)
}

fn level_color(level: Option<&str>) -> Option<Rgb> {
    match level?.to_lowercase().as_str() {
        "red" => Some(Rgb(224, 0, 0)),
        "orange" => Some(Rgb(255, 140, 0)),
        "yellow" => Some(Rgb(255, 255, 0)),
        _ => None,
    }
}

/// Map a Met Éireann symbol number (e.g. `"03"`, `"46n"`) onto [`WeatherCode`].
pub fn weather_code(number: &str) -> Option<WeatherCode> {
    let starts = |prefixes: &[&str]| prefixes.iter().any(|p| number.starts_with(p));

    if starts(&["01", "02"]) {
        Some(WeatherCode::Clear)
    } else if starts(&["03"]) {
        Some(WeatherCode::PartlyCloudy)
    } else if starts(&["04"]) {
        Some(WeatherCode::Cloudy)
    } else if starts(&["05", "09", "10", "40", "41", "46"]) {
        Some(WeatherCode::Rain)
    } else if starts(&["06", "11", "14", "2", "30", "31", "32", "33", "34"]) {
        Some(WeatherCode::Thunderstorm)
    } else if starts(&["07", "12", "42", "43", "47", "48"]) {
        Some(WeatherCode::Sleet)
    } else if starts(&["08", "13", "44", "45", "49", "50"]) {
        Some(WeatherCode::Snow)
    } else if starts(&["15"]) {
        Some(WeatherCode::Fog)
    } else if starts(&["51", "52"]) {
        Some(WeatherCode::Hail)
    } else {
        None
    }
}

//! AccuWeather payloads → domain model.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use super::json::*;
use crate::{
    aggregate::{daily_air_quality, group_by_local_day, local_date},
    error::ConvertError,
    model::*,
    provider::{ProviderId, unix_to_utc},
    units::{
        PrecipitationUnit, beaufort_level, convert_precipitation_text, kmh_to_ms,
        moon_phase_angle, uv_level,
    },
};

/// Everything fetched for one location, ready to convert.
#[derive(Debug, Clone)]
pub struct AccuResponses {
    pub current: AccuCurrentResult,
    pub daily: AccuForecastDailyResult,
    pub hourly: Vec<AccuForecastHourlyResult>,
    pub minutely: Option<AccuMinutelyResult>,
    pub alerts: Vec<AccuAlertResult>,
    pub air_quality: AccuAirQualityResult,
}

pub fn convert_location(
    existing: Option<&Location>,
    result: &AccuLocationResult,
    zip_code: Option<&str>,
) -> Location {
    let zip_suffix = zip_code.map(|zip| format!(" ({zip})")).unwrap_or_default();
    let time_zone = result.time_zone.name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(time_zone = %result.time_zone.name, "unknown AccuWeather time zone, using UTC");
        Tz::UTC
    });
    let is_china = result
        .country
        .id
        .as_deref()
        .is_some_and(|id| ["cn", "hk", "tw"].iter().any(|c| id.eq_ignore_ascii_case(c)));

    let mut location = Location {
        city_id: Some(result.key.clone()),
        latitude: result.geo_position.latitude,
        longitude: result.geo_position.longitude,
        time_zone,
        country: result.country.localized_name.clone(),
        country_code: result.country.id.clone(),
        province: None,
        city: String::new(),
        district: None,
        source: ProviderId::Accu,
        is_china,
        parameters: Default::default(),
    };

    let named = existing.filter(|l| {
        l.province.as_deref().is_some_and(|p| !p.is_empty())
            && !l.city.is_empty()
            && l.district.as_deref().is_some_and(|d| !d.is_empty())
    });

    match named {
        Some(existing) => {
            location.province = existing.province.clone();
            location.city = existing.city.clone();
            location.district = existing.district.as_ref().map(|d| format!("{d}{zip_suffix}"));
        }
        None => {
            location.province = Some(
                result
                    .administrative_area
                    .as_ref()
                    .map(|a| a.localized_name.clone())
                    .unwrap_or_default(),
            );
            location.city = format!("{}{zip_suffix}", result.localized_name);
        }
    }

    location
}

/// Build the full weather for `location`.
///
/// Without daily or hourly forecasts the payload is treated as garbage.
pub fn convert_weather(
    location: &Location,
    responses: &AccuResponses,
    unit: PrecipitationUnit,
    now: DateTime<Utc>,
) -> Result<Weather, ConvertError> {
    let daily_forecasts = match responses.daily.daily_forecasts.as_deref() {
        Some(daily) if !daily.is_empty() && !responses.hourly.is_empty() => daily,
        _ => return Err(ConvertError::InvalidOrIncompleteData),
    };

    let current = &responses.current;
    let publish_date = unix_to_utc(current.epoch_time)
        .ok_or_else(|| ConvertError::invalid_date(current.epoch_time.to_string()))?;
    let air_quality_data = responses.air_quality.data.as_deref();

    let hourly_forecast = hourly_list(&responses.hourly, air_quality_data)?;
    let daily_forecast =
        daily_list(daily_forecasts, &hourly_forecast, location.time_zone, unit)?;

    let text = |t: Option<&String>| t.map(|t| convert_precipitation_text(t, unit));

    let current_weather = Current {
        weather_text: current.weather_text.clone(),
        weather_code: current.weather_icon.and_then(weather_code),
        temperature: Temperature {
            temperature: metric_rounded(&current.temperature),
            real_feel: metric_rounded(&current.real_feel_temperature),
            real_feel_shade: metric_rounded(&current.real_feel_temperature_shade),
            apparent: metric_rounded(&current.apparent_temperature),
            wind_chill: metric_rounded(&current.wind_chill_temperature),
            wet_bulb: metric_rounded(&current.wet_bulb_temperature),
            degree_day: None,
        },
        wind: current_wind(current.wind.as_ref()),
        uv: Uv {
            index: current.uv_index,
            level: uv_level(current.uv_index),
            description: current.uv_index_text.clone(),
        },
        air_quality: air_quality_data
            .and_then(|data| data.first())
            .and_then(|first| air_quality_for_hour(first.epoch_date, air_quality_data)),
        relative_humidity: current.relative_humidity,
        pressure: metric(&current.pressure),
        visibility: metric(&current.visibility),
        dew_point: metric_rounded(&current.dew_point),
        cloud_cover: current.cloud_cover,
        ceiling: metric(&current.ceiling).map(|m| m / 1000.0),
        daily_forecast: text(responses.daily.headline.as_ref().and_then(|h| h.text.as_ref())),
        hourly_forecast: text(
            responses
                .minutely
                .as_ref()
                .and_then(|m| m.summary.as_ref())
                .and_then(|s| s.long_phrase.as_ref()),
        ),
    };

    let past_day = current
        .temperature_summary
        .as_ref()
        .and_then(|s| s.past24_hour_range.as_ref());
    let yesterday = History {
        date: publish_date - Duration::hours(24),
        daytime_temperature: past_day.and_then(|r| metric_rounded(&r.maximum)),
        nighttime_temperature: past_day.and_then(|r| metric_rounded(&r.minimum)),
    };

    Ok(Weather {
        base: Base { city_id: location.city_id.clone(), publish_date, update_date: now },
        current: Some(current_weather),
        yesterday: Some(yesterday),
        daily_forecast,
        hourly_forecast,
        minutely_forecast: minutely_list(responses.minutely.as_ref())?,
        alert_list: alert_list(&responses.alerts),
    })
}

fn daily_list(
    forecasts: &[AccuForecastDailyForecast],
    hourly: &[Hourly],
    tz: Tz,
    unit: PrecipitationUnit,
) -> Result<Vec<Daily>, ConvertError> {
    let hourly_by_day = group_by_local_day(hourly, tz);

    forecasts
        .iter()
        .map(|forecast| {
            let date = unix_to_utc(forecast.epoch_date)
                .ok_or_else(|| ConvertError::invalid_date(forecast.epoch_date.to_string()))?;
            let day_hours = hourly_by_day.get(&local_date(date, tz));

            let temperature = forecast.temperature.clone().unwrap_or_default();
            let real_feel = forecast.real_feel_temperature.clone().unwrap_or_default();
            let real_feel_shade = forecast.real_feel_temperature_shade.clone().unwrap_or_default();
            let degree_days = forecast.degree_day_summary.as_ref();

            let day = half_day(
                forecast.day.as_ref(),
                Temperature {
                    temperature: rounded(&temperature.maximum),
                    real_feel: rounded(&real_feel.maximum),
                    real_feel_shade: rounded(&real_feel_shade.maximum),
                    degree_day: degree_days.and_then(|d| rounded(&d.heating)),
                    ..Default::default()
                },
                unit,
            );
            let night = half_day(
                forecast.night.as_ref(),
                Temperature {
                    temperature: rounded(&temperature.minimum),
                    real_feel: rounded(&real_feel.minimum),
                    real_feel_shade: rounded(&real_feel_shade.minimum),
                    degree_day: degree_days.and_then(|d| rounded(&d.cooling)),
                    ..Default::default()
                },
                unit,
            );

            let moon = forecast.moon.as_ref();
            Ok(Daily {
                date,
                day,
                night,
                sun: Astro {
                    rise_date: forecast.sun.as_ref().and_then(|s| s.epoch_rise).and_then(unix_to_utc),
                    set_date: forecast.sun.as_ref().and_then(|s| s.epoch_set).and_then(unix_to_utc),
                },
                moon: Astro {
                    rise_date: moon.and_then(|m| m.epoch_rise).and_then(unix_to_utc),
                    set_date: moon.and_then(|m| m.epoch_set).and_then(unix_to_utc),
                },
                moon_phase: MoonPhase {
                    angle: moon_phase_angle(moon.and_then(|m| m.phase.as_deref())),
                    description: moon.and_then(|m| m.phase.clone()),
                },
                air_quality: day_hours.and_then(|hours| daily_air_quality(hours)),
                pollen: daily_pollen(forecast.air_and_pollen.as_deref()),
                uv: daily_uv(forecast.air_and_pollen.as_deref()),
                hours_of_sun: forecast.hours_of_sun,
            })
        })
        .collect()
}

fn half_day(
    half: Option<&AccuHalfDay>,
    temperature: Temperature,
    unit: PrecipitationUnit,
) -> HalfDay {
    let Some(half) = half else {
        return HalfDay { temperature, ..Default::default() };
    };

    HalfDay {
        weather_text: half.long_phrase.as_deref().map(|t| convert_precipitation_text(t, unit)),
        weather_phase: half.short_phrase.clone(),
        weather_code: half.icon.and_then(weather_code),
        temperature,
        precipitation: Precipitation {
            total: value(&half.total_liquid),
            rain: value(&half.rain),
            snow: value(&half.snow).map(snow_cm_to_mm),
            ice: value(&half.ice),
        },
        precipitation_probability: PrecipitationProbability {
            total: half.precipitation_probability,
            thunderstorm: half.thunderstorm_probability,
            rain: half.rain_probability,
            snow: half.snow_probability,
            ice: half.ice_probability,
        },
        precipitation_duration: PrecipitationDuration {
            total: half.hours_of_precipitation,
            rain: half.hours_of_rain,
            snow: half.hours_of_snow,
            ice: half.hours_of_ice,
        },
        wind: forecast_wind(half.wind.as_ref()),
        cloud_cover: half.cloud_cover,
    }
}

fn daily_pollen(list: Option<&[AccuAirAndPollen]>) -> Option<Pollen> {
    let list = list?;
    let reading = |name: &str| {
        list.iter().find(|p| p.name == name).map(|p| PollenReading {
            index: p.value,
            level: p.category_value,
            description: p.category.clone(),
        })
    };

    Some(Pollen {
        grass: reading("Grass"),
        mold: reading("Mold"),
        ragweed: reading("Ragweed"),
        tree: reading("Tree"),
    })
}

fn daily_uv(list: Option<&[AccuAirAndPollen]>) -> Option<Uv> {
    let uv = list?.iter().find(|p| p.name == "UVIndex");
    Some(Uv {
        index: uv.and_then(|u| u.value).map(f64::from),
        level: uv.and_then(|u| u.category.clone()),
        description: None,
    })
}

fn hourly_list(
    results: &[AccuForecastHourlyResult],
    air_quality: Option<&[AccuAirQualityData]>,
) -> Result<Vec<Hourly>, ConvertError> {
    results
        .iter()
        .map(|result| {
            let date = unix_to_utc(result.epoch_date_time)
                .ok_or_else(|| ConvertError::invalid_date(result.epoch_date_time.to_string()))?;

            Ok(Hourly {
                date,
                is_daylight: result.is_daylight,
                weather_text: result.icon_phrase.clone(),
                weather_code: result.weather_icon.and_then(weather_code),
                temperature: Temperature {
                    temperature: rounded(&result.temperature),
                    real_feel: rounded(&result.real_feel_temperature),
                    real_feel_shade: rounded(&result.real_feel_temperature_shade),
                    wet_bulb: rounded(&result.wet_bulb_temperature),
                    ..Default::default()
                },
                precipitation: Precipitation {
                    total: value(&result.total_liquid),
                    rain: value(&result.rain),
                    snow: value(&result.snow).map(snow_cm_to_mm),
                    ice: value(&result.ice),
                },
                precipitation_probability: PrecipitationProbability {
                    total: result.precipitation_probability,
                    thunderstorm: result.thunderstorm_probability,
                    rain: result.rain_probability,
                    snow: result.snow_probability,
                    ice: result.ice_probability,
                },
                wind: forecast_wind(result.wind.as_ref()),
                air_quality: air_quality_for_hour(result.epoch_date_time, air_quality),
                uv: Uv {
                    index: result.uv_index,
                    level: uv_level(result.uv_index),
                    description: result.uv_index_text.clone(),
                },
                relative_humidity: result.relative_humidity,
                pressure: None,
            })
        })
        .collect()
}

/// Pollutants of the air quality sample stamped exactly `epoch`.
///
/// Returns `None` rather than an all-empty value so daily averaging can skip it.
pub fn air_quality_for_hour(
    epoch: i64,
    data: Option<&[AccuAirQualityData]>,
) -> Option<AirQuality> {
    let sample = data?.iter().find(|d| d.epoch_date == epoch)?;

    let mut air_quality = AirQuality::default();
    for pollutant in sample.pollutants.iter().flatten() {
        let value = pollutant.concentration.value;
        match pollutant.kind.as_str() {
            "O3" => air_quality.o3 = value,
            "NO2" => air_quality.no2 = value,
            "PM2_5" => air_quality.pm25 = value,
            "PM10" => air_quality.pm10 = value,
            "SO2" => air_quality.so2 = value,
            "CO" => air_quality.co = value.map(|v| v / 1000.0),
            other => debug!(pollutant = other, "ignoring unsupported pollutant"),
        }
    }

    (!air_quality.is_empty()).then_some(air_quality)
}

fn minutely_list(result: Option<&AccuMinutelyResult>) -> Result<Vec<Minutely>, ConvertError> {
    let Some(intervals) = result.and_then(|r| r.intervals.as_deref()) else {
        return Ok(Vec::new());
    };

    intervals
        .iter()
        .map(|interval| {
            let date = DateTime::from_timestamp_millis(interval.start_epoch_date_time)
                .ok_or_else(|| {
                    ConvertError::invalid_date(interval.start_epoch_date_time.to_string())
                })?;
            Ok(Minutely {
                date,
                minute_interval: interval.minute,
                weather_text: interval.short_phrase.clone(),
                weather_code: interval.icon_code.and_then(weather_code),
                dbz: Some(round_half_up(interval.dbz) as i32),
                cloud_cover: interval.cloud_cover,
            })
        })
        .collect()
}

pub fn alert_list(results: &[AccuAlertResult]) -> Vec<Alert> {
    results
        .iter()
        .map(|result| {
            let area = result.area.as_ref().and_then(|a| a.first());
            Alert {
                alert_id: result.alert_id.to_string(),
                start_date: area.and_then(|a| unix_to_utc(a.epoch_start_time)),
                end_date: area.and_then(|a| a.epoch_end_time).and_then(unix_to_utc),
                headline: None,
                description: result.description.as_ref().and_then(|d| d.localized.clone()),
                content: area.and_then(|a| a.text.clone()),
                alert_type: result.type_id.clone(),
                priority: result.priority,
                severity: AlertSeverity::Unknown,
                color: result.color.as_ref().map(|c| Rgb(c.red, c.green, c.blue)),
            }
        })
        .collect()
}

/// Map an AccuWeather icon number onto [`WeatherCode`].
pub fn weather_code(icon: i32) -> Option<WeatherCode> {
    let code = match icon {
        1 | 2 | 30 | 33 | 34 => WeatherCode::Clear,
        3 | 4 | 6 | 35 | 36 | 38 => WeatherCode::PartlyCloudy,
        5 | 37 => WeatherCode::Haze,
        7 | 8 => WeatherCode::Cloudy,
        11 => WeatherCode::Fog,
        12 | 13 | 14 | 18 | 39 | 40 => WeatherCode::Rain,
        15 | 16 | 17 | 41 | 42 => WeatherCode::Thunderstorm,
        19..=24 | 31 | 43 | 44 => WeatherCode::Snow,
        25 => WeatherCode::Hail,
        26 | 29 => WeatherCode::Sleet,
        32 => WeatherCode::Wind,
        _ => return None,
    };
    Some(code)
}

fn current_wind(wind: Option<&AccuCurrentWind>) -> Wind {
    let speed_kmh = wind.and_then(|w| w.speed.as_ref()).and_then(AccuUnits::metric_value);
    build_wind(wind.and_then(|w| w.direction.as_ref()), speed_kmh)
}

fn forecast_wind(wind: Option<&AccuForecastWind>) -> Wind {
    let speed_kmh = wind.and_then(|w| w.speed.as_ref()).and_then(|s| s.value);
    build_wind(wind.and_then(|w| w.direction.as_ref()), speed_kmh)
}

fn build_wind(direction: Option<&AccuWindDirection>, speed_kmh: Option<f64>) -> Wind {
    let speed = speed_kmh.map(kmh_to_ms);
    Wind {
        direction: direction.and_then(|d| d.localized.clone()),
        degree: direction.and_then(|d| d.degrees),
        speed,
        level: speed.map(beaufort_level),
    }
}

fn value(v: &Option<AccuValue>) -> Option<f64> {
    v.as_ref()?.value
}

fn rounded(v: &Option<AccuValue>) -> Option<f64> {
    value(v).map(round_half_up)
}

fn metric(v: &Option<AccuUnits>) -> Option<f64> {
    v.as_ref()?.metric_value()
}

fn metric_rounded(v: &Option<AccuUnits>) -> Option<f64> {
    metric(v).map(round_half_up)
}

fn snow_cm_to_mm(cm: f64) -> f64 {
    PrecipitationUnit::Cm.to_mm(cm)
}

/// Whole degrees, halves rounded towards positive infinity.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    const LOCATION_JSON: &str = r#"{
        "Key": "207931",
        "LocalizedName": "Dublin",
        "Country": { "ID": "IE", "LocalizedName": "Ireland" },
        "AdministrativeArea": { "ID": "D", "LocalizedName": "Dublin" },
        "TimeZone": { "Name": "Europe/Dublin", "GmtOffset": 1.0 },
        "GeoPosition": { "Latitude": 53.349, "Longitude": -6.26 }
    }"#;

    // 2024-06-01T11:00:00Z
    const NOW_EPOCH: i64 = 1_717_239_600;

    fn location() -> Location {
        let result: AccuLocationResult = serde_json::from_str(LOCATION_JSON).unwrap();
        convert_location(None, &result, None)
    }

    fn current() -> AccuCurrentResult {
        serde_json::from_str(&format!(
            r#"{{
                "EpochTime": {NOW_EPOCH},
                "WeatherText": "Partly sunny",
                "WeatherIcon": 3,
                "Temperature": {{ "Metric": {{ "Value": 15.5, "Unit": "C" }} }},
                "RealFeelTemperature": {{ "Metric": {{ "Value": 14.4, "Unit": "C" }} }},
                "RelativeHumidity": 72,
                "DewPoint": {{ "Metric": {{ "Value": 10.6 }} }},
                "Wind": {{
                    "Direction": {{ "Degrees": 225, "Localized": "SW" }},
                    "Speed": {{ "Metric": {{ "Value": 18.0, "Unit": "km/h" }} }}
                }},
                "UVIndex": 4,
                "UVIndexText": "Moderate",
                "Visibility": {{ "Metric": {{ "Value": 16.1 }} }},
                "CloudCover": 55,
                "Ceiling": {{ "Metric": {{ "Value": 1200.0 }} }},
                "Pressure": {{ "Metric": {{ "Value": 1014.0 }} }},
                "TemperatureSummary": {{
                    "Past24HourRange": {{
                        "Minimum": {{ "Metric": {{ "Value": 8.2 }} }},
                        "Maximum": {{ "Metric": {{ "Value": 17.8 }} }}
                    }}
                }}
            }}"#
        ))
        .unwrap()
    }

    fn daily() -> AccuForecastDailyResult {
        serde_json::from_str(&format!(
            r#"{{
                "Headline": {{ "Text": "Rain 5-10 mm Sunday" }},
                "DailyForecasts": [{{
                    "EpochDate": {day},
                    "Sun": {{ "EpochRise": {rise}, "EpochSet": {set} }},
                    "Moon": {{ "EpochRise": null, "EpochSet": {set}, "Phase": "WaxingCrescent" }},
                    "Temperature": {{
                        "Minimum": {{ "Value": 9.4 }},
                        "Maximum": {{ "Value": 18.5 }}
                    }},
                    "HoursOfSun": 6.2,
                    "AirAndPollen": [
                        {{ "Name": "Grass", "Value": 12, "Category": "Moderate", "CategoryValue": 2 }},
                        {{ "Name": "UVIndex", "Value": 5, "Category": "Moderate", "CategoryValue": 2 }}
                    ],
                    "Day": {{
                        "Icon": 12,
                        "ShortPhrase": "Showers",
                        "LongPhrase": "Showers, 1-2 cm of snow on the hills",
                        "PrecipitationProbability": 70,
                        "Wind": {{ "Speed": {{ "Value": 36.0 }}, "Direction": {{ "Degrees": 270, "Localized": "W" }} }},
                        "TotalLiquid": {{ "Value": 4.1 }},
                        "Snow": {{ "Value": 0.5 }},
                        "HoursOfPrecipitation": 3.0
                    }},
                    "Night": {{ "Icon": 34, "LongPhrase": "Clearing" }}
                }}]
            }}"#,
            day = NOW_EPOCH - 11 * 3600 + 5 * 3600,
            rise = NOW_EPOCH - 6 * 3600,
            set = NOW_EPOCH + 9 * 3600,
        ))
        .unwrap()
    }

    fn hourly() -> Vec<AccuForecastHourlyResult> {
        serde_json::from_str(&format!(
            r#"[
                {{ "EpochDateTime": {h1}, "WeatherIcon": 3, "IconPhrase": "Partly sunny",
                   "IsDaylight": true, "Temperature": {{ "Value": 16.4 }},
                   "Wind": {{ "Speed": {{ "Value": 7.2 }} }}, "UVIndex": 3 }},
                {{ "EpochDateTime": {h2}, "WeatherIcon": 12, "IconPhrase": "Showers",
                   "IsDaylight": true, "Temperature": {{ "Value": 15.5 }},
                   "Snow": {{ "Value": 0.2 }} }}
            ]"#,
            h1 = NOW_EPOCH + 3600,
            h2 = NOW_EPOCH + 7200,
        ))
        .unwrap()
    }

    fn air_quality() -> AccuAirQualityResult {
        serde_json::from_str(&format!(
            r#"{{ "data": [
                {{ "epochDate": {h1}, "pollutants": [
                    {{ "type": "PM2_5", "concentration": {{ "value": 8.0 }} }},
                    {{ "type": "CO", "concentration": {{ "value": 250.0 }} }}
                ] }},
                {{ "epochDate": {h2}, "pollutants": [
                    {{ "type": "PM2_5", "concentration": {{ "value": 12.0 }} }}
                ] }}
            ] }}"#,
            h1 = NOW_EPOCH + 3600,
            h2 = NOW_EPOCH + 7200,
        ))
        .unwrap()
    }

    fn responses() -> AccuResponses {
        AccuResponses {
            current: current(),
            daily: daily(),
            hourly: hourly(),
            minutely: None,
            alerts: Vec::new(),
            air_quality: air_quality(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(NOW_EPOCH + 60, 0).unwrap()
    }

    #[test]
    fn location_from_search_result() {
        let location = location();

        assert_eq!(location.city_id.as_deref(), Some("207931"));
        assert_eq!(location.time_zone, chrono_tz::Europe::Dublin);
        assert_eq!(location.country, "Ireland");
        assert_eq!(location.province.as_deref(), Some("Dublin"));
        assert_eq!(location.city, "Dublin");
        assert!(!location.is_china);
    }

    #[test]
    fn location_keeps_existing_names_and_appends_zip() {
        let result: AccuLocationResult = serde_json::from_str(LOCATION_JSON).unwrap();
        let mut existing = Location::from_coordinates(53.3, -6.2, ProviderId::Accu);
        existing.province = Some("Leinster".into());
        existing.city = "Dublin City".into();
        existing.district = Some("Ringsend".into());

        let location = convert_location(Some(&existing), &result, Some("D04"));
        assert_eq!(location.province.as_deref(), Some("Leinster"));
        assert_eq!(location.city, "Dublin City");
        assert_eq!(location.district.as_deref(), Some("Ringsend (D04)"));

        let location = convert_location(None, &result, Some("D04"));
        assert_eq!(location.city, "Dublin (D04)");
    }

    #[test]
    fn china_flag_and_unknown_time_zone() {
        let json = LOCATION_JSON
            .replace(r#""ID": "IE""#, r#""ID": "HK""#)
            .replace("Europe/Dublin", "Mars/Olympus");
        let result: AccuLocationResult = serde_json::from_str(&json).unwrap();
        let location = convert_location(None, &result, None);

        assert!(location.is_china);
        assert_eq!(location.time_zone, Tz::UTC);
    }

    #[test]
    fn converts_current_conditions() {
        let weather = convert_weather(&location(), &responses(), PrecipitationUnit::Mm, now())
            .unwrap();
        let current = weather.current.unwrap();

        assert_eq!(weather.base.publish_date, Utc.timestamp_opt(NOW_EPOCH, 0).unwrap());
        assert_eq!(weather.base.update_date, now());
        assert_eq!(current.weather_code, Some(WeatherCode::PartlyCloudy));
        assert_eq!(current.temperature.temperature, Some(16.0));
        assert_eq!(current.temperature.real_feel, Some(14.0));
        assert_eq!(current.dew_point, Some(11.0));
        assert_eq!(current.wind.speed, Some(5.0));
        assert_eq!(current.wind.level, Some(3));
        assert_eq!(current.wind.direction.as_deref(), Some("SW"));
        assert_eq!(current.uv.level.as_deref(), Some("Moderate"));
        assert_eq!(current.ceiling, Some(1.2));
        assert_eq!(current.daily_forecast.as_deref(), Some("Rain 5-10 mm Sunday"));

        // First air quality sample: CO converted to mg/m³.
        let aq = current.air_quality.unwrap();
        assert_eq!(aq.pm25, Some(8.0));
        assert_eq!(aq.co, Some(0.25));

        let yesterday = weather.yesterday.unwrap();
        assert_eq!(yesterday.daytime_temperature, Some(18.0));
        assert_eq!(yesterday.nighttime_temperature, Some(8.0));
    }

    #[test]
    fn converts_daily_with_hourly_air_quality() {
        let weather = convert_weather(&location(), &responses(), PrecipitationUnit::Mm, now())
            .unwrap();
        let day = &weather.daily_forecast[0];

        assert_eq!(day.day.temperature.temperature, Some(19.0));
        assert_eq!(day.night.temperature.temperature, Some(9.0));
        assert_eq!(day.day.weather_code, Some(WeatherCode::Rain));
        assert_eq!(day.night.weather_code, Some(WeatherCode::Clear));
        assert_eq!(
            day.day.weather_text.as_deref(),
            Some("Showers, 10-20 mm of snow on the hills")
        );
        assert_eq!(day.day.precipitation.snow, Some(5.0));
        assert_eq!(day.day.wind.speed, Some(10.0));
        assert_eq!(day.moon_phase.angle, Some(45));
        assert!(day.moon.rise_date.is_none());
        assert!(day.sun.rise_date.is_some());

        let pollen = day.pollen.as_ref().unwrap();
        assert_eq!(pollen.grass.as_ref().unwrap().index, Some(12));
        assert!(pollen.tree.is_none());
        assert_eq!(day.uv.as_ref().unwrap().index, Some(5.0));

        // Averaged over both hourly samples of the day.
        assert_eq!(day.air_quality.unwrap().pm25, Some(10.0));
    }

    #[test]
    fn daily_phrases_follow_precipitation_unit() {
        let weather = convert_weather(&location(), &responses(), PrecipitationUnit::In, now())
            .unwrap();
        let day = &weather.daily_forecast[0];

        assert_eq!(
            day.day.weather_text.as_deref(),
            Some("Showers, 0.39-0.79 in of snow on the hills")
        );
        assert_eq!(day.night.weather_text.as_deref(), Some("Clearing"));
    }

    #[test]
    fn converts_hourly() {
        let weather = convert_weather(&location(), &responses(), PrecipitationUnit::Cm, now())
            .unwrap();

        assert_eq!(weather.hourly_forecast.len(), 2);
        let first = &weather.hourly_forecast[0];
        assert_eq!(first.temperature.temperature, Some(16.0));
        assert_eq!(first.wind.speed, Some(2.0));
        assert_eq!(first.air_quality.unwrap().pm25, Some(8.0));
        assert_eq!(weather.hourly_forecast[1].precipitation.snow, Some(2.0));

        let current = weather.current.unwrap();
        assert_eq!(current.daily_forecast.as_deref(), Some("Rain 0.5-1 cm Sunday"));
    }

    #[test]
    fn missing_hourly_or_daily_is_invalid() {
        let mut no_hourly = responses();
        no_hourly.hourly.clear();
        assert_eq!(
            convert_weather(&location(), &no_hourly, PrecipitationUnit::Mm, now()),
            Err(ConvertError::InvalidOrIncompleteData)
        );

        let mut no_daily = responses();
        no_daily.daily.daily_forecasts = None;
        assert_eq!(
            convert_weather(&location(), &no_daily, PrecipitationUnit::Mm, now()),
            Err(ConvertError::InvalidOrIncompleteData)
        );
    }

    #[test]
    fn converts_minutely_and_alerts() {
        let mut responses = responses();
        responses.minutely = Some(
            serde_json::from_str(&format!(
                r#"{{
                    "Summary": {{ "LongPhrase": "Light rain for 30 min" }},
                    "Intervals": [
                        {{ "StartEpochDateTime": {ms}, "Minute": 0, "Dbz": 22.5,
                           "ShortPhrase": "Light rain", "IconCode": 12, "CloudCover": 90 }}
                    ]
                }}"#,
                ms = NOW_EPOCH * 1000
            ))
            .unwrap(),
        );
        responses.alerts = serde_json::from_str(&format!(
            r#"[{{
                "AlertID": 42,
                "Description": {{ "Localized": "Wind Warning" }},
                "Priority": 3,
                "TypeID": "WIND",
                "Color": {{ "Red": 255, "Green": 140, "Blue": 0 }},
                "Area": [{{ "EpochStartTime": {start}, "EpochEndTime": {end}, "Text": "Gusts to 90 km/h" }}]
            }}]"#,
            start = NOW_EPOCH,
            end = NOW_EPOCH + 6 * 3600
        ))
        .unwrap();

        let weather = convert_weather(&location(), &responses, PrecipitationUnit::Mm, now())
            .unwrap();

        let minute = &weather.minutely_forecast[0];
        assert_eq!(minute.date, Utc.timestamp_opt(NOW_EPOCH, 0).unwrap());
        assert_eq!(minute.dbz, Some(23));
        assert_eq!(minute.weather_code, Some(WeatherCode::Rain));
        assert_eq!(
            weather.current.unwrap().hourly_forecast.as_deref(),
            Some("Light rain for 30 min")
        );

        let alert = &weather.alert_list[0];
        assert_eq!(alert.alert_id, "42");
        assert_eq!(alert.description.as_deref(), Some("Wind Warning"));
        assert_eq!(alert.content.as_deref(), Some("Gusts to 90 km/h"));
        assert_eq!(alert.priority, Some(3));
        assert_eq!(alert.color, Some(Rgb(255, 140, 0)));
        assert_eq!(alert.end_date, Utc.timestamp_opt(NOW_EPOCH + 6 * 3600, 0).single());
    }

    #[test]
    fn air_quality_requires_matching_epoch() {
        let aq = air_quality();
        let data = aq.data.as_deref();

        assert!(air_quality_for_hour(NOW_EPOCH + 3600, data).is_some());
        assert!(air_quality_for_hour(NOW_EPOCH, data).is_none());
        assert!(air_quality_for_hour(NOW_EPOCH, None).is_none());
    }

    #[rstest]
    #[case(1, Some(WeatherCode::Clear))]
    #[case(6, Some(WeatherCode::PartlyCloudy))]
    #[case(37, Some(WeatherCode::Haze))]
    #[case(8, Some(WeatherCode::Cloudy))]
    #[case(11, Some(WeatherCode::Fog))]
    #[case(18, Some(WeatherCode::Rain))]
    #[case(42, Some(WeatherCode::Thunderstorm))]
    #[case(22, Some(WeatherCode::Snow))]
    #[case(25, Some(WeatherCode::Hail))]
    #[case(29, Some(WeatherCode::Sleet))]
    #[case(32, Some(WeatherCode::Wind))]
    #[case(9, None)]
    #[case(99, None)]
    fn icon_codes(#[case] icon: i32, #[case] expected: Option<WeatherCode>) {
        assert_eq!(weather_code(icon), expected);
    }

    #[rstest]
    #[case(2.5, 3.0)]
    #[case(-2.5, -2.0)]
    #[case(-2.6, -3.0)]
    fn halves_round_up(#[case] input: f64, #[case] expected: f64) {
        assert_eq!(round_half_up(input), expected);
    }
}

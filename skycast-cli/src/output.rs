//! Human-readable rendering of weather results.

use chrono::{DateTime, Utc};

use skycast_core::{
    Alert, Config, HourlyTrendDisplay, Location, Origin, PrecipitationUnit, WeatherResult,
    model::Hourly,
    units::beaufort_description,
};

const HOURS_SHOWN: usize = 12;
const COLUMN_WIDTH: usize = 9;

pub fn print_weather(
    location: &Location,
    result: &WeatherResult,
    config: &Config,
    now: DateTime<Utc>,
) {
    let weather = &result.weather;
    let tz = location.time_zone;
    let unit = config.precipitation_unit;

    println!("{} ({})", location.display_name(), location.source.display_name());
    let updated = weather.base.update_date.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z");
    match result.origin {
        Origin::Cache => println!("Updated {updated} (cached)"),
        Origin::Provider => println!("Updated {updated}"),
        Origin::StaleCache => println!("Updated {updated} (offline, showing last known data)"),
    }

    if let Some(current) = &weather.current {
        println!();
        let period = if weather.is_daylight(location, now) { "day" } else { "night" };
        println!(
            "Now ({period}): {}  {}  feels {}",
            current.weather_text.as_deref().unwrap_or("-"),
            temperature(current.temperature.temperature),
            temperature(current.temperature.feels_like()),
        );
        if let Some(speed) = current.wind.speed {
            let level = current.wind.level.map(beaufort_description).unwrap_or("-");
            println!(
                "Wind: {} {speed:.1} m/s ({level})",
                current.wind.direction.as_deref().unwrap_or("")
            );
        }
        if let Some(humidity) = current.relative_humidity {
            println!("Humidity: {humidity:.0}%");
        }
        if let Some(uv) = current.uv.index {
            println!("UV: {uv:.0} {}", current.uv.level.as_deref().unwrap_or(""));
        }
        if let Some(summary) = &current.hourly_forecast {
            println!("{summary}");
        }
        if let Some(summary) = &current.daily_forecast {
            println!("{summary}");
        }
    }

    let upcoming: Vec<&Hourly> =
        weather.hourly_forecast.iter().filter(|h| h.date >= now).take(HOURS_SHOWN).collect();
    if !upcoming.is_empty() {
        let columns = config.hourly_trend_display.tags();
        println!();
        let header: String =
            columns.iter().map(|c| format!("{:>COLUMN_WIDTH$}", c.label())).collect();
        println!("{:<6}{:<15}{header}", "Hour", "");
        for hourly in upcoming {
            let cells: String = columns
                .iter()
                .map(|c| format!("{:>COLUMN_WIDTH$}", trend_cell(hourly, *c, unit)))
                .collect();
            println!(
                "{:<6}{:<15}{cells}",
                hourly.date.with_timezone(&tz).format("%H:%M").to_string(),
                hourly.weather_code.map(|c| c.as_str()).unwrap_or("-"),
            );
        }
    }

    if !weather.daily_forecast.is_empty() {
        println!();
        for daily in &weather.daily_forecast {
            let day_text =
                daily.day.weather_text.as_deref().or(daily.day.weather_phase.as_deref());
            println!(
                "{:<12}{:>6} /{:>6}  {:<10}{}",
                daily.date.with_timezone(&tz).format("%a %d %b").to_string(),
                temperature(daily.day.temperature.temperature),
                temperature(daily.night.temperature.temperature),
                precipitation(daily.day.precipitation.total, unit),
                day_text.unwrap_or(""),
            );
        }
    }

    if !weather.alert_list.is_empty() {
        println!();
        print_alerts(location, &weather.alert_list);
    }
}

pub fn print_alerts(location: &Location, alerts: &[Alert]) {
    if alerts.is_empty() {
        println!("No active alerts for {}.", location.display_name());
        return;
    }

    for alert in alerts {
        let color = alert.color.map(|c| format!(" {c}")).unwrap_or_default();
        println!(
            "[{:?}{color}] {}",
            alert.severity,
            alert.headline.as_deref().unwrap_or(&alert.alert_id)
        );
        let window = match (alert.start_date, alert.end_date) {
            (Some(start), Some(end)) => Some(format!(
                "{} → {}",
                start.with_timezone(&location.time_zone).format("%a %H:%M"),
                end.with_timezone(&location.time_zone).format("%a %H:%M")
            )),
            (Some(start), None) => {
                Some(format!("from {}", start.with_timezone(&location.time_zone).format("%a %H:%M")))
            }
            _ => None,
        };
        if let Some(window) = window {
            println!("  {window}");
        }
        if let Some(description) = &alert.description {
            println!("  {description}");
        }
    }
}

/// Text shown for one hour in the given trend column.
pub fn trend_cell(hourly: &Hourly, column: HourlyTrendDisplay, unit: PrecipitationUnit) -> String {
    let number = |value: Option<f64>, suffix: &str| {
        value.map(|v| format!("{v:.0}{suffix}")).unwrap_or_else(|| "-".to_string())
    };

    match column {
        HourlyTrendDisplay::Temperature => temperature(hourly.temperature.temperature),
        HourlyTrendDisplay::FeelsLike => temperature(hourly.temperature.feels_like()),
        HourlyTrendDisplay::AirQuality => number(hourly.air_quality.and_then(|aq| aq.pm25), ""),
        HourlyTrendDisplay::Wind => {
            hourly.wind.speed.map(|s| format!("{s:.1}m/s")).unwrap_or_else(|| "-".to_string())
        }
        HourlyTrendDisplay::UvIndex => number(hourly.uv.index, ""),
        HourlyTrendDisplay::Precipitation => precipitation(hourly.precipitation.total, unit),
        HourlyTrendDisplay::Humidity => number(hourly.relative_humidity, "%"),
        HourlyTrendDisplay::Pressure => number(hourly.pressure, ""),
    }
}

fn temperature(value: Option<f64>) -> String {
    value.map(|t| format!("{t:.0}°")).unwrap_or_else(|| "-".to_string())
}

/// Millimetres rendered in the configured unit.
fn precipitation(mm: Option<f64>, unit: PrecipitationUnit) -> String {
    match mm {
        Some(mm) => {
            let value = unit.from_mm(mm);
            let value = format!("{value:.2}");
            let value = value.trim_end_matches('0').trim_end_matches('.');
            format!("{value}{}", unit.symbol())
        }
        None => "-".to_string(),
    }
}

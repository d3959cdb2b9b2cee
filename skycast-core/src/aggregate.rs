//! Daily values derived from hourly records.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;

use crate::model::{AirQuality, Hourly};

/// Bucket hourly records by their local calendar date in `tz`.
pub fn group_by_local_day(hourly: &[Hourly], tz: Tz) -> BTreeMap<NaiveDate, Vec<&Hourly>> {
    let mut days: BTreeMap<NaiveDate, Vec<&Hourly>> = BTreeMap::new();
    for hour in hourly {
        days.entry(local_date(hour.date, tz)).or_default().push(hour);
    }
    days
}

pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Local midnight of `date` in `tz`, as an instant.
///
/// Returns `None` when midnight does not exist locally (DST gap at 00:00).
pub fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Average each pollutant over the hours that report it.
pub fn daily_air_quality(hours: &[&Hourly]) -> Option<AirQuality> {
    let samples: Vec<&AirQuality> = hours
        .iter()
        .filter_map(|h| h.air_quality.as_ref())
        .filter(|aq| !aq.is_empty())
        .collect();

    if samples.is_empty() {
        return None;
    }

    let average = |pick: fn(&AirQuality) -> Option<f64>| {
        let values: Vec<f64> = samples.iter().filter_map(|aq| pick(aq)).collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    };

    Some(AirQuality {
        pm25: average(|aq| aq.pm25),
        pm10: average(|aq| aq.pm10),
        so2: average(|aq| aq.so2),
        no2: average(|aq| aq.no2),
        o3: average(|aq| aq.o3),
        co: average(|aq| aq.co),
    })
}

/// `(max, min)` temperature across the given hours.
pub fn daily_temperature_range(hours: &[&Hourly]) -> Option<(f64, f64)> {
    hours
        .iter()
        .filter_map(|h| h.temperature.temperature)
        .fold(None, |range, t| match range {
            None => Some((t, t)),
            Some((max, min)) => Some((f64::max(max, t), f64::min(min, t))),
        })
}

/// Sum of total precipitation across the given hours, if any hour reports it.
pub fn daily_precipitation_total(hours: &[&Hourly]) -> Option<f64> {
    hours
        .iter()
        .filter_map(|h| h.precipitation.total)
        .fold(None, |sum, p| Some(sum.unwrap_or(0.0) + p))
}

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::{Alert, Location, WeatherCode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub base: Base,
    pub current: Option<Current>,
    pub yesterday: Option<History>,
    pub daily_forecast: Vec<Daily>,
    pub hourly_forecast: Vec<Hourly>,
    pub minutely_forecast: Vec<Minutely>,
    pub alert_list: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub city_id: Option<String>,
    /// When the provider produced the data.
    pub publish_date: DateTime<Utc>,
    /// When we fetched it.
    pub update_date: DateTime<Utc>,
}

impl Weather {
    /// Whether cached data is still fresh for the given polling interval.
    ///
    /// Data stamped in the future (clock changes) is never considered fresh.
    pub fn is_valid(&self, now: DateTime<Utc>, polling_interval: Option<Duration>) -> bool {
        match polling_interval {
            None => true,
            Some(interval) => {
                let updated = self.base.update_date;
                now >= updated && now - updated < interval
            }
        }
    }

    /// Whether `now` falls between today's sunrise and sunset at `location`.
    ///
    /// Without astro data, 06:00–18:00 local time counts as daylight.
    pub fn is_daylight(&self, location: &Location, now: DateTime<Utc>) -> bool {
        let tz = location.time_zone;
        let minutes = |instant: DateTime<Utc>| {
            let local = instant.with_timezone(&tz);
            60 * local.hour() + local.minute()
        };
        let time = minutes(now);

        let sun = self.daily_forecast.first().map(|d| &d.sun);
        let (sunrise, sunset) = match sun {
            Some(Astro { rise_date: Some(rise), set_date: Some(set) }) => (minutes(*rise), minutes(*set)),
            _ => (6 * 60, 18 * 60),
        };

        sunrise < time && time < sunset
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Current {
    pub weather_text: Option<String>,
    pub weather_code: Option<WeatherCode>,
    pub temperature: Temperature,
    pub wind: Wind,
    pub uv: Uv,
    pub air_quality: Option<AirQuality>,
    pub relative_humidity: Option<f64>,
    /// hPa
    pub pressure: Option<f64>,
    /// km
    pub visibility: Option<f64>,
    pub dew_point: Option<f64>,
    pub cloud_cover: Option<i32>,
    /// km
    pub ceiling: Option<f64>,
    /// Headline text describing the coming days.
    pub daily_forecast: Option<String>,
    /// Nowcast text describing the coming hours.
    pub hourly_forecast: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub date: DateTime<Utc>,
    pub daytime_temperature: Option<f64>,
    pub nighttime_temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Daily {
    /// Local midnight of the forecast day.
    pub date: DateTime<Utc>,
    pub day: HalfDay,
    pub night: HalfDay,
    pub sun: Astro,
    pub moon: Astro,
    pub moon_phase: MoonPhase,
    pub air_quality: Option<AirQuality>,
    pub pollen: Option<Pollen>,
    pub uv: Option<Uv>,
    pub hours_of_sun: Option<f64>,
}

impl Daily {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            day: HalfDay::default(),
            night: HalfDay::default(),
            sun: Astro::default(),
            moon: Astro::default(),
            moon_phase: MoonPhase::default(),
            air_quality: None,
            pollen: None,
            uv: None,
            hours_of_sun: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HalfDay {
    pub weather_text: Option<String>,
    pub weather_phase: Option<String>,
    pub weather_code: Option<WeatherCode>,
    pub temperature: Temperature,
    pub precipitation: Precipitation,
    pub precipitation_probability: PrecipitationProbability,
    pub precipitation_duration: PrecipitationDuration,
    pub wind: Wind,
    pub cloud_cover: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hourly {
    pub date: DateTime<Utc>,
    pub is_daylight: bool,
    pub weather_text: Option<String>,
    pub weather_code: Option<WeatherCode>,
    pub temperature: Temperature,
    pub precipitation: Precipitation,
    pub precipitation_probability: PrecipitationProbability,
    pub wind: Wind,
    pub air_quality: Option<AirQuality>,
    pub uv: Uv,
    pub relative_humidity: Option<f64>,
    pub pressure: Option<f64>,
}

impl Hourly {
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            is_daylight: true,
            weather_text: None,
            weather_code: None,
            temperature: Temperature::default(),
            precipitation: Precipitation::default(),
            precipitation_probability: PrecipitationProbability::default(),
            wind: Wind::default(),
            air_quality: None,
            uv: Uv::default(),
            relative_humidity: None,
            pressure: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minutely {
    pub date: DateTime<Utc>,
    pub minute_interval: i32,
    pub weather_text: Option<String>,
    pub weather_code: Option<WeatherCode>,
    pub dbz: Option<i32>,
    pub cloud_cover: Option<i32>,
}

/// Temperatures in °C.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Temperature {
    pub temperature: Option<f64>,
    pub real_feel: Option<f64>,
    pub real_feel_shade: Option<f64>,
    pub apparent: Option<f64>,
    pub wind_chill: Option<f64>,
    pub wet_bulb: Option<f64>,
    pub degree_day: Option<f64>,
}

impl Temperature {
    pub fn of(temperature: Option<f64>) -> Self {
        Self { temperature, ..Default::default() }
    }

    /// Best available "feels like" value.
    pub fn feels_like(&self) -> Option<f64> {
        self.real_feel.or(self.apparent).or(self.wind_chill)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Wind {
    pub direction: Option<String>,
    pub degree: Option<f64>,
    /// m/s
    pub speed: Option<f64>,
    /// Beaufort level.
    pub level: Option<u8>,
}

/// Amounts in mm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Precipitation {
    pub total: Option<f64>,
    pub rain: Option<f64>,
    pub snow: Option<f64>,
    pub ice: Option<f64>,
}

/// Probabilities in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrecipitationProbability {
    pub total: Option<f64>,
    pub thunderstorm: Option<f64>,
    pub rain: Option<f64>,
    pub snow: Option<f64>,
    pub ice: Option<f64>,
}

/// Durations in hours.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrecipitationDuration {
    pub total: Option<f64>,
    pub rain: Option<f64>,
    pub snow: Option<f64>,
    pub ice: Option<f64>,
}

/// Pollutant concentrations: µg/m³, except CO in mg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AirQuality {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub so2: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub co: Option<f64>,
}

impl AirQuality {
    pub fn is_empty(&self) -> bool {
        self.pm25.is_none()
            && self.pm10.is_none()
            && self.so2.is_none()
            && self.no2.is_none()
            && self.o3.is_none()
            && self.co.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pollen {
    pub grass: Option<PollenReading>,
    pub mold: Option<PollenReading>,
    pub ragweed: Option<PollenReading>,
    pub tree: Option<PollenReading>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PollenReading {
    pub index: Option<i32>,
    pub level: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Uv {
    pub index: Option<f64>,
    pub level: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Astro {
    pub rise_date: Option<DateTime<Utc>>,
    pub set_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MoonPhase {
    /// Degrees, 45° steps, new moon at 360.
    pub angle: Option<i32>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;
    use chrono::TimeZone;

    fn weather_updated_at(update_date: DateTime<Utc>) -> Weather {
        Weather {
            base: Base { city_id: None, publish_date: update_date, update_date },
            current: None,
            yesterday: None,
            daily_forecast: Vec::new(),
            hourly_forecast: Vec::new(),
            minutely_forecast: Vec::new(),
            alert_list: Vec::new(),
        }
    }

    #[test]
    fn validity_depends_on_polling_interval() {
        let updated = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let weather = weather_updated_at(updated);
        let interval = Some(Duration::minutes(90));

        assert!(weather.is_valid(updated + Duration::minutes(30), interval));
        assert!(!weather.is_valid(updated + Duration::minutes(90), interval));
        assert!(!weather.is_valid(updated - Duration::minutes(1), interval));
        assert!(weather.is_valid(updated + Duration::days(30), None));
    }

    #[test]
    fn daylight_uses_first_day_astro() {
        let location = Location::from_coordinates(0.0, 0.0, ProviderId::Accu);
        let mut weather = weather_updated_at(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        let mut today = Daily::new(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        today.sun = Astro {
            rise_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
            set_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 16, 30, 0).unwrap()),
        };
        weather.daily_forecast.push(today);

        assert!(!weather.is_daylight(&location, Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap()));
        assert!(weather.is_daylight(&location, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
        assert!(!weather.is_daylight(&location, Utc.with_ymd_and_hms(2024, 3, 1, 17, 0, 0).unwrap()));
    }

    #[test]
    fn daylight_falls_back_to_six_to_eighteen() {
        let location = Location::from_coordinates(0.0, 0.0, ProviderId::Accu);
        let weather = weather_updated_at(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        assert!(weather.is_daylight(&location, Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap()));
        assert!(!weather.is_daylight(&location, Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap()));
    }

    #[test]
    fn empty_air_quality() {
        assert!(AirQuality::default().is_empty());
        assert!(!AirQuality { o3: Some(40.0), ..Default::default() }.is_empty());
    }
}

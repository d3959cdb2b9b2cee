//! Provider-independent weather model.
//!
//! Every provider converter produces these types. They are plain values:
//! built once from a response, cached as JSON, never mutated afterwards.

mod alert;
mod location;
mod weather;
mod weather_code;

pub use alert::{Alert, AlertSeverity, Rgb};
pub use location::{Location, LocationQuery};
pub use weather::{
    AirQuality, Astro, Base, Current, Daily, HalfDay, History, Hourly, Minutely, MoonPhase,
    Pollen, PollenReading, Precipitation, PrecipitationDuration, PrecipitationProbability,
    Temperature, Uv, Weather, Wind,
};
pub use weather_code::WeatherCode;

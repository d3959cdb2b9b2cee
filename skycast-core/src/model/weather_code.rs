use serde::{Deserialize, Serialize};

/// Shared condition taxonomy every provider code is folded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCode {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Snow,
    Wind,
    Fog,
    Haze,
    Sleet,
    Hail,
    Thunder,
    Thunderstorm,
}

impl WeatherCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCode::Clear => "clear",
            WeatherCode::PartlyCloudy => "partly_cloudy",
            WeatherCode::Cloudy => "cloudy",
            WeatherCode::Rain => "rain",
            WeatherCode::Snow => "snow",
            WeatherCode::Wind => "wind",
            WeatherCode::Fog => "fog",
            WeatherCode::Haze => "haze",
            WeatherCode::Sleet => "sleet",
            WeatherCode::Hail => "hail",
            WeatherCode::Thunder => "thunder",
            WeatherCode::Thunderstorm => "thunderstorm",
        }
    }
}

impl std::fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

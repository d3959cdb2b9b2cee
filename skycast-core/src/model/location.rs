use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::provider::ProviderId;

/// A coordinate to resolve into a provider [`Location`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocationQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Appended to the resolved place name, e.g. "Dublin (D02)".
    pub zip_code: Option<String>,
}

impl LocationQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, zip_code: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Provider-specific location key, when the provider has one.
    pub city_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: Tz,
    pub country: String,
    pub country_code: Option<String>,
    pub province: Option<String>,
    pub city: String,
    pub district: Option<String>,
    pub source: ProviderId,
    pub is_china: bool,
    /// Extra per-source parameters, e.g. `parameters["metie"]["region"]`.
    #[serde(default)]
    pub parameters: HashMap<String, HashMap<String, String>>,
}

impl Location {
    /// A bare coordinate, before any provider has resolved it.
    pub fn from_coordinates(latitude: f64, longitude: f64, source: ProviderId) -> Self {
        Self {
            city_id: None,
            latitude,
            longitude,
            time_zone: Tz::UTC,
            country: String::new(),
            country_code: None,
            province: None,
            city: String::new(),
            district: None,
            source,
            is_china: false,
            parameters: HashMap::new(),
        }
    }

    /// Stable identifier used as cache key.
    pub fn formatted_id(&self) -> String {
        match &self.city_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("{}&{}&{}", self.latitude, self.longitude, self.source),
        }
    }

    pub fn parameter(&self, source: &str, key: &str) -> Option<&str> {
        self.parameters.get(source)?.get(key).map(String::as_str)
    }

    /// Human-readable place name, most specific part first.
    pub fn display_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(district) = self.district.as_deref().filter(|d| !d.is_empty()) {
            parts.push(district);
        }
        if !self.city.is_empty() {
            parts.push(&self.city);
        }
        if let Some(province) = self.province.as_deref().filter(|p| !p.is_empty()) {
            parts.push(province);
        }
        if !self.country.is_empty() {
            parts.push(&self.country);
        }

        if parts.is_empty() {
            format!("{:.4}, {:.4}", self.latitude, self.longitude)
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_id_prefers_city_id() {
        let mut location = Location::from_coordinates(53.35, -6.26, ProviderId::MetIe);
        assert_eq!(location.formatted_id(), "53.35&-6.26&metie");

        location.city_id = Some("207931".into());
        assert_eq!(location.formatted_id(), "207931");
    }

    #[test]
    fn display_name_falls_back_to_coordinates() {
        let mut location = Location::from_coordinates(53.35, -6.26, ProviderId::MetIe);
        assert_eq!(location.display_name(), "53.3500, -6.2600");

        location.city = "Dublin".into();
        location.country = "Ireland".into();
        assert_eq!(location.display_name(), "Dublin, Ireland");
    }

    #[test]
    fn parameter_lookup() {
        let mut location = Location::from_coordinates(0.0, 0.0, ProviderId::MetIe);
        location
            .parameters
            .entry("metie".into())
            .or_default()
            .insert("region".into(), "Cork".into());

        assert_eq!(location.parameter("metie", "region"), Some("Cork"));
        assert_eq!(location.parameter("metie", "other"), None);
        assert_eq!(location.parameter("accu", "region"), None);
    }
}

//! Which hourly series are shown, and in what order.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyTrendDisplay {
    Temperature,
    FeelsLike,
    AirQuality,
    Wind,
    UvIndex,
    Precipitation,
    Humidity,
    Pressure,
}

impl HourlyTrendDisplay {
    pub const fn all() -> &'static [HourlyTrendDisplay] {
        &[
            HourlyTrendDisplay::Temperature,
            HourlyTrendDisplay::FeelsLike,
            HourlyTrendDisplay::AirQuality,
            HourlyTrendDisplay::Wind,
            HourlyTrendDisplay::UvIndex,
            HourlyTrendDisplay::Precipitation,
            HourlyTrendDisplay::Humidity,
            HourlyTrendDisplay::Pressure,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HourlyTrendDisplay::Temperature => "temperature",
            HourlyTrendDisplay::FeelsLike => "feels_like",
            HourlyTrendDisplay::AirQuality => "air_quality",
            HourlyTrendDisplay::Wind => "wind",
            HourlyTrendDisplay::UvIndex => "uv_index",
            HourlyTrendDisplay::Precipitation => "precipitation",
            HourlyTrendDisplay::Humidity => "humidity",
            HourlyTrendDisplay::Pressure => "pressure",
        }
    }

    /// Column header used when rendering the hourly table.
    pub fn label(&self) -> &'static str {
        match self {
            HourlyTrendDisplay::Temperature => "Temp",
            HourlyTrendDisplay::FeelsLike => "Feels",
            HourlyTrendDisplay::AirQuality => "PM2.5",
            HourlyTrendDisplay::Wind => "Wind",
            HourlyTrendDisplay::UvIndex => "UV",
            HourlyTrendDisplay::Precipitation => "Precip",
            HourlyTrendDisplay::Humidity => "Hum",
            HourlyTrendDisplay::Pressure => "hPa",
        }
    }
}

impl fmt::Display for HourlyTrendDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HourlyTrendDisplay {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();
        HourlyTrendDisplay::all()
            .iter()
            .copied()
            .find(|tag| tag.as_str() == lower)
            .ok_or_else(|| {
                let supported: Vec<&str> =
                    HourlyTrendDisplay::all().iter().map(|t| t.as_str()).collect();
                anyhow!(
                    "Unknown hourly trend '{value}'. Supported trends: {}.",
                    supported.join(", ")
                )
            })
    }
}

/// Ordered, duplicate-free list of displayed hourly trends.
///
/// Persisted as the tag ids joined with `&`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendDisplayList(Vec<HourlyTrendDisplay>);

impl Default for TrendDisplayList {
    fn default() -> Self {
        Self(vec![
            HourlyTrendDisplay::Temperature,
            HourlyTrendDisplay::Precipitation,
            HourlyTrendDisplay::Wind,
            HourlyTrendDisplay::UvIndex,
            HourlyTrendDisplay::AirQuality,
        ])
    }
}

impl TrendDisplayList {
    pub fn new(tags: impl IntoIterator<Item = HourlyTrendDisplay>) -> Self {
        let mut list = Self(Vec::new());
        for tag in tags {
            list.insert(tag);
        }
        list
    }

    pub fn tags(&self) -> &[HourlyTrendDisplay] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: HourlyTrendDisplay) -> bool {
        self.0.contains(&tag)
    }

    pub fn position(&self, tag: HourlyTrendDisplay) -> Option<usize> {
        self.0.iter().position(|t| *t == tag)
    }

    /// Append `tag`; returns `false` when it was already shown.
    pub fn insert(&mut self, tag: HourlyTrendDisplay) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn remove(&mut self, index: usize) -> Result<HourlyTrendDisplay> {
        if index >= self.0.len() {
            return Err(anyhow!(
                "Trend position {index} is out of range (list has {} entries).",
                self.0.len()
            ));
        }
        Ok(self.0.remove(index))
    }

    /// Move the entry at `from` so it ends up at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.0.len();
        if from >= len || to >= len {
            return Err(anyhow!(
                "Cannot move trend from {from} to {to}: list has {len} entries."
            ));
        }
        let tag = self.0.remove(from);
        self.0.insert(to, tag);
        Ok(())
    }

    /// Trends not currently shown, in declaration order.
    pub fn others(&self) -> Vec<HourlyTrendDisplay> {
        HourlyTrendDisplay::all()
            .iter()
            .copied()
            .filter(|tag| !self.contains(*tag))
            .collect()
    }

    pub fn to_value(&self) -> String {
        self.0.iter().map(|t| t.as_str()).collect::<Vec<_>>().join("&")
    }

    /// Parse a `&`-joined value; unknown ids are rejected, duplicates dropped.
    pub fn parse(value: &str) -> Result<Self> {
        let tags = value
            .split('&')
            .filter(|part| !part.trim().is_empty())
            .map(HourlyTrendDisplay::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(tags))
    }
}

impl Serialize for TrendDisplayList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_value())
    }
}

impl<'de> Deserialize<'de> for TrendDisplayList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        TrendDisplayList::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HourlyTrendDisplay::*;

    #[test]
    fn insert_ignores_duplicates() {
        let mut list = TrendDisplayList::new([Temperature, Wind]);
        assert!(!list.insert(Wind));
        assert!(list.insert(Humidity));
        assert_eq!(list.tags(), &[Temperature, Wind, Humidity]);
    }

    #[test]
    fn move_item_reorders() {
        let mut list = TrendDisplayList::new([Temperature, Wind, UvIndex]);
        list.move_item(0, 2).unwrap();
        assert_eq!(list.tags(), &[Wind, UvIndex, Temperature]);

        list.move_item(2, 0).unwrap();
        assert_eq!(list.tags(), &[Temperature, Wind, UvIndex]);

        assert!(list.move_item(0, 3).is_err());
    }

    #[test]
    fn remove_returns_the_tag() {
        let mut list = TrendDisplayList::new([Temperature, Wind]);
        assert_eq!(list.remove(1).unwrap(), Wind);
        assert!(list.remove(5).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn others_are_the_complement() {
        let list = TrendDisplayList::new([Temperature, Wind, UvIndex]);
        let others = list.others();

        assert_eq!(others.len(), HourlyTrendDisplay::all().len() - 3);
        assert!(others.iter().all(|t| !list.contains(*t)));
    }

    #[test]
    fn value_roundtrip_and_errors() {
        let list = TrendDisplayList::parse("wind&temperature&wind&").unwrap();
        assert_eq!(list.tags(), &[Wind, Temperature]);
        assert_eq!(list.to_value(), "wind&temperature");

        let err = TrendDisplayList::parse("wind&sunshine").unwrap_err();
        assert!(err.to_string().contains("Unknown hourly trend 'sunshine'"));

        assert!(TrendDisplayList::parse("").unwrap().is_empty());
    }
}

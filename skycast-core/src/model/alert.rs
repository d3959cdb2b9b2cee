use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Extreme,
    Severe,
    Moderate,
    Minor,
    #[default]
    Unknown,
}

impl AlertSeverity {
    /// Parse a CAP-style severity word, case-insensitively.
    pub fn from_cap(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("extreme") => AlertSeverity::Extreme,
            Some("severe") => AlertSeverity::Severe,
            Some("moderate") => AlertSeverity::Moderate,
            Some("minor") => AlertSeverity::Minor,
            _ => AlertSeverity::Unknown,
        }
    }
}

/// Display color attached to an alert by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub alert_type: Option<String>,
    pub priority: Option<i32>,
    pub severity: AlertSeverity,
    pub color: Option<Rgb>,
}

impl Alert {
    pub fn new(alert_id: impl Into<String>) -> Self {
        Self {
            alert_id: alert_id.into(),
            start_date: None,
            end_date: None,
            headline: None,
            description: None,
            content: None,
            alert_type: None,
            priority: None,
            severity: AlertSeverity::Unknown,
            color: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_is_case_insensitive() {
        assert_eq!(AlertSeverity::from_cap(Some("Severe")), AlertSeverity::Severe);
        assert_eq!(AlertSeverity::from_cap(Some("MINOR")), AlertSeverity::Minor);
        assert_eq!(AlertSeverity::from_cap(Some("whatever")), AlertSeverity::Unknown);
        assert_eq!(AlertSeverity::from_cap(None), AlertSeverity::Unknown);
    }

    #[test]
    fn rgb_formats_as_hex() {
        assert_eq!(Rgb(255, 140, 0).to_string(), "#ff8c00");
    }
}

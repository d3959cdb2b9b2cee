//! Unit helpers shared by the provider converters.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    Cm,
    In,
    Lpsqm,
}

impl PrecipitationUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::Cm => "cm",
            PrecipitationUnit::In => "in",
            PrecipitationUnit::Lpsqm => "L/m²",
        }
    }

    fn factor(&self) -> f64 {
        match self {
            PrecipitationUnit::Mm | PrecipitationUnit::Lpsqm => 1.0,
            PrecipitationUnit::Cm => 10.0,
            PrecipitationUnit::In => 25.4,
        }
    }

    /// Convert a value expressed in this unit into millimetres.
    pub fn to_mm(&self, value: f64) -> f64 {
        value * self.factor()
    }

    /// Convert millimetres into this unit.
    pub fn from_mm(&self, mm: f64) -> f64 {
        mm / self.factor()
    }
}

impl TryFrom<&str> for PrecipitationUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "mm" => Ok(PrecipitationUnit::Mm),
            "cm" => Ok(PrecipitationUnit::Cm),
            "in" => Ok(PrecipitationUnit::In),
            "lpsqm" => Ok(PrecipitationUnit::Lpsqm),
            _ => Err(anyhow::anyhow!(
                "Unknown precipitation unit '{value}'. Supported units: mm, cm, in, lpsqm."
            )),
        }
    }
}

static CM_RANGE: LazyLock<Regex> = LazyLock::new(|| range_pattern(PrecipitationUnit::Cm));
static MM_RANGE: LazyLock<Regex> = LazyLock::new(|| range_pattern(PrecipitationUnit::Mm));

fn range_pattern(unit: PrecipitationUnit) -> Regex {
    let pattern = format!(r"([0-9]+)-([0-9]+)\s*{}", regex::escape(unit.symbol()));
    Regex::new(&pattern).expect("precipitation range pattern is valid")
}

/// Rewrite amount ranges like `"1-2 cm"` or `"5-10mm"` inside free text into `unit`.
///
/// Centimetre ranges are rewritten first, then millimetre ranges.
pub fn convert_precipitation_text(text: &str, unit: PrecipitationUnit) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = convert_ranges(&CM_RANGE, text, PrecipitationUnit::Cm, unit);
    convert_ranges(&MM_RANGE, &text, PrecipitationUnit::Mm, unit)
}

fn convert_ranges(
    pattern: &Regex,
    text: &str,
    source: PrecipitationUnit,
    target: PrecipitationUnit,
) -> String {
    pattern
        .replace_all(text, |caps: &Captures| {
            let bounds = (caps[1].parse::<f64>(), caps[2].parse::<f64>());
            match bounds {
                (Ok(low), Ok(high)) => format!(
                    "{}-{} {}",
                    format_amount(target.from_mm(source.to_mm(low))),
                    format_amount(target.from_mm(source.to_mm(high))),
                    target.symbol()
                ),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", (value * 100.0).round() / 100.0);
    formatted.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh / 3.6
}

/// Upper bounds (m/s) of Beaufort levels 0 to 11.
const BEAUFORT_LIMITS: [f64; 12] =
    [0.3, 1.6, 3.4, 5.5, 8.0, 10.8, 13.9, 17.2, 20.8, 24.5, 28.5, 32.7];

pub fn beaufort_level(speed_ms: f64) -> u8 {
    BEAUFORT_LIMITS
        .iter()
        .position(|&limit| speed_ms < limit)
        .unwrap_or(BEAUFORT_LIMITS.len()) as u8
}

pub fn beaufort_description(level: u8) -> &'static str {
    match level {
        0 => "Calm",
        1 => "Light air",
        2 => "Light breeze",
        3 => "Gentle breeze",
        4 => "Moderate breeze",
        5 => "Fresh breeze",
        6 => "Strong breeze",
        7 => "Near gale",
        8 => "Gale",
        9 => "Strong gale",
        10 => "Storm",
        11 => "Violent storm",
        _ => "Hurricane",
    }
}

pub fn uv_level(index: Option<f64>) -> Option<String> {
    let index = index?;
    let level = if index <= 2.0 {
        "Low"
    } else if index <= 5.0 {
        "Moderate"
    } else if index <= 7.0 {
        "High"
    } else if index <= 10.0 {
        "Very high"
    } else {
        "Extreme"
    };
    Some(level.to_string())
}

/// Angle of a named moon phase; anything unrecognized is a new moon.
pub fn moon_phase_angle(phase: Option<&str>) -> Option<i32> {
    let phase = phase.filter(|p| !p.is_empty())?;
    let normalized: String = phase
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    let angle = match normalized.as_str() {
        "waxingcrescent" => 45,
        "first" | "firstquarter" => 90,
        "waxinggibbous" => 135,
        "full" | "fullmoon" => 180,
        "waninggibbous" => 225,
        "third" | "thirdquarter" | "last" | "lastquarter" => 270,
        "waningcrescent" => 315,
        _ => 360,
    };
    Some(angle)
}

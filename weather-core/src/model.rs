use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::LookupError;

/// A validated, non-empty city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery(String);

impl ForecastQuery {
    /// Trims `city`; whitespace-only input is rejected before any I/O.
    pub fn new(city: &str) -> Result<Self, LookupError> {
        let trimmed = city.trim();
        if trimmed.is_empty() {
            return Err(LookupError::EmptyInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn city(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ForecastQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative path as returned by the API, e.g. `//cdn.weatherapi.com/...`.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub pressure_mb: f64,
    pub uv: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    /// Local time of the forecast location, `YYYY-MM-DD HH:MM`.
    pub time: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
}

/// Snapshot of one successful lookup. Only the first forecast day's hours are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub location: Location,
    pub current: CurrentConditions,
    pub hours: Vec<HourlyEntry>,
}

/// Temperature unit used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    pub fn symbol(&self) -> char {
        match self {
            DisplayUnit::Celsius => 'C',
            DisplayUnit::Fahrenheit => 'F',
        }
    }

    /// Select the value matching this unit from an API-supplied pair.
    pub fn pick(&self, celsius: f64, fahrenheit: f64) -> f64 {
        match self {
            DisplayUnit::Celsius => celsius,
            DisplayUnit::Fahrenheit => fahrenheit,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            DisplayUnit::Celsius => DisplayUnit::Fahrenheit,
            DisplayUnit::Fahrenheit => DisplayUnit::Celsius,
        }
    }

    pub const fn all() -> &'static [DisplayUnit] {
        &[DisplayUnit::Celsius, DisplayUnit::Fahrenheit]
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisplayUnit::Celsius => "celsius",
            DisplayUnit::Fahrenheit => "fahrenheit",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown unit '{0}'. Supported units: c, celsius, f, fahrenheit.")]
pub struct UnknownUnit(String);

impl FromStr for DisplayUnit {
    type Err = UnknownUnit;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" => Ok(DisplayUnit::Celsius),
            "f" | "fahrenheit" => Ok(DisplayUnit::Fahrenheit),
            _ => Err(UnknownUnit(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_trimmed() {
        let q = ForecastQuery::new("  Rochester \n").expect("non-empty city");
        assert_eq!(q.city(), "Rochester");
    }

    #[test]
    fn blank_query_is_rejected() {
        for input in ["", " ", "\t\n  "] {
            assert!(matches!(ForecastQuery::new(input), Err(LookupError::EmptyInput)));
        }
    }

    #[test]
    fn unit_display_parses_back() {
        for unit in DisplayUnit::all() {
            let parsed: DisplayUnit = unit.to_string().parse().expect("own name must parse");
            assert_eq!(*unit, parsed);
        }
    }

    #[test]
    fn unit_short_names() {
        assert_eq!("C".parse::<DisplayUnit>().unwrap(), DisplayUnit::Celsius);
        assert_eq!("f".parse::<DisplayUnit>().unwrap(), DisplayUnit::Fahrenheit);
        assert!("kelvin".parse::<DisplayUnit>().is_err());
    }

    #[test]
    fn default_unit_is_celsius() {
        assert_eq!(DisplayUnit::default(), DisplayUnit::Celsius);
        assert_eq!(DisplayUnit::Celsius.toggled(), DisplayUnit::Fahrenheit);
        assert_eq!(DisplayUnit::Fahrenheit.pick(20.0, 68.0), 68.0);
    }
}

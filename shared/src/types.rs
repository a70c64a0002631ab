//! Common types used across the weather assistant

use serde::{Deserialize, Serialize};

/// Default distance (in degrees, roughly 1 km) below which two locations
/// are treated as the same place for caching purposes.
pub const DEFAULT_COORDINATE_THRESHOLD: f64 = 0.01;

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when either axis moved by more than `threshold` degrees.
    pub fn differs_from(&self, other: &Coordinates, threshold: f64) -> bool {
        (self.latitude - other.latitude).abs() > threshold
            || (self.longitude - other.longitude).abs() > threshold
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_query(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

/// Wind speed unit preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kmh,
    Mph,
    Ms,
}

impl WindSpeedUnit {
    pub fn as_query(&self) -> &'static str {
        match self {
            WindSpeedUnit::Kmh => "kmh",
            WindSpeedUnit::Mph => "mph",
            WindSpeedUnit::Ms => "ms",
        }
    }
}

/// Precipitation unit preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    Inch,
}

impl PrecipitationUnit {
    pub fn as_query(&self) -> &'static str {
        match self {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::Inch => "inch",
        }
    }
}

/// Unit preferences forwarded to the forecast API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Units {
    #[serde(default)]
    pub temperature: TemperatureUnit,
    #[serde(default)]
    pub wind_speed: WindSpeedUnit,
    #[serde(default)]
    pub precipitation: PrecipitationUnit,
}

impl Units {
    /// Celsius / km/h / mm, the units the transition thresholds are expressed in
    pub fn metric() -> Self {
        Self::default()
    }

    pub fn is_metric_temperature(&self) -> bool {
        self.temperature == TemperatureUnit::Celsius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_within_threshold() {
        let a = Coordinates::new(40.7128, -74.006);
        let b = Coordinates::new(40.7178, -74.001);
        assert!(!a.differs_from(&b, DEFAULT_COORDINATE_THRESHOLD));
    }

    #[test]
    fn test_coordinates_beyond_threshold() {
        let a = Coordinates::new(40.7128, -74.006);
        let b = Coordinates::new(40.7328, -74.006);
        assert!(a.differs_from(&b, DEFAULT_COORDINATE_THRESHOLD));
    }

    #[test]
    fn test_unit_query_names() {
        assert_eq!(TemperatureUnit::Fahrenheit.as_query(), "fahrenheit");
        assert_eq!(WindSpeedUnit::Ms.as_query(), "ms");
        assert_eq!(PrecipitationUnit::Inch.as_query(), "inch");
        assert!(Units::metric().is_metric_temperature());
    }
}

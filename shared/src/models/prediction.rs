//! Weather prediction models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of forecast transition a prediction describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PredictionKind {
    RainStarting,
    RainStopping,
    TempDrop,
    TempRise,
    WeatherChange,
}

impl PredictionKind {
    pub const ALL: [PredictionKind; 5] = [
        PredictionKind::RainStarting,
        PredictionKind::RainStopping,
        PredictionKind::TempDrop,
        PredictionKind::TempRise,
        PredictionKind::WeatherChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionKind::RainStarting => "rain_starting",
            PredictionKind::RainStopping => "rain_stopping",
            PredictionKind::TempDrop => "temp_drop",
            PredictionKind::TempRise => "temp_rise",
            PredictionKind::WeatherChange => "weather_change",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Preference category that gates notifications of this kind
    pub fn category(&self) -> AlertCategory {
        match self {
            PredictionKind::RainStarting | PredictionKind::RainStopping => AlertCategory::Rain,
            PredictionKind::TempDrop | PredictionKind::TempRise => AlertCategory::Temperature,
            PredictionKind::WeatherChange => AlertCategory::Condition,
        }
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing alert categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Rain,
    Temperature,
    Condition,
}

/// Notification priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Weather conditions on one side of a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub temperature: i32,
    pub weather_code: i32,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<u8>,
}

/// A detected forecast transition and when to tell the user about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub kind: PredictionKind,
    pub scheduled_for: DateTime<Utc>,
    pub current_conditions: Conditions,
    pub future_conditions: Conditions,
    /// Deterministic text, used whenever generated text is unavailable
    pub message: String,
    pub priority: Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in PredictionKind::ALL {
            assert_eq!(PredictionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PredictionKind::parse("morning_brief"), None);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PredictionKind::WeatherChange).unwrap();
        assert_eq!(json, "\"weather_change\"");
    }

    #[test]
    fn test_kind_categories() {
        assert_eq!(PredictionKind::RainStopping.category(), AlertCategory::Rain);
        assert_eq!(PredictionKind::TempRise.category(), AlertCategory::Temperature);
        assert_eq!(PredictionKind::WeatherChange.category(), AlertCategory::Condition);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }
}

//! Forecast data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One forecast hour as consumed by the transition detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySample {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub weather_code: i32,
    pub precipitation_mm: f64,
    pub precipitation_probability: u8,
}

impl HourlySample {
    /// Temperature rounded to whole degrees, as shown to users
    pub fn rounded_temperature(&self) -> i32 {
        self.temperature_c.round() as i32
    }
}

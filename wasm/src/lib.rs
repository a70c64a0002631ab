//! WebAssembly module for the weather assistant
//!
//! Provides client-side computation for:
//! - Forecast transition detection (predictions without a server round trip)
//! - WMO weather code lookups
//! - Forecast cache invalidation checks

use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Detect predictions in a JSON array of hourly samples.
///
/// `now_ms` is a JavaScript timestamp (milliseconds since the epoch).
#[wasm_bindgen]
pub fn detect_predictions(samples_json: &str, now_ms: f64) -> Result<String, JsValue> {
    detect_json(samples_json, now_ms).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e));
        JsValue::from_str(&e)
    })
}

/// Detect predictions relative to the device clock
#[wasm_bindgen]
pub fn detect_predictions_now(samples_json: &str) -> Result<String, JsValue> {
    detect_predictions(samples_json, js_sys::Date::now())
}

fn detect_json(samples_json: &str, now_ms: f64) -> Result<String, String> {
    let mut samples: Vec<HourlySample> = serde_json::from_str(samples_json)
        .map_err(|e| format!("Invalid samples JSON: {}", e))?;
    // The detector walks hours in order; anything after a step back is dropped
    shared::truncate_unordered(&mut samples);
    let now = DateTime::<Utc>::from_timestamp_millis(now_ms as i64)
        .ok_or_else(|| format!("Invalid timestamp: {}", now_ms))?;

    let predictions = shared::detect(&samples, now);
    serde_json::to_string(&predictions).map_err(|e| e.to_string())
}

/// Describe a WMO weather code
#[wasm_bindgen]
pub fn weather_description(code: i32) -> String {
    shared::wmo::description(code).to_string()
}

/// Emoji for a WMO weather code
#[wasm_bindgen]
pub fn weather_emoji(code: i32) -> String {
    shared::wmo::emoji(code).to_string()
}

/// Format a temperature for display, e.g. "21°C"
#[wasm_bindgen]
pub fn format_temperature(temperature: f64, fahrenheit: bool) -> String {
    let unit = if fahrenheit {
        TemperatureUnit::Fahrenheit
    } else {
        TemperatureUnit::Celsius
    };
    format!("{}{}", temperature.round() as i64, unit.symbol())
}

/// Whether a cached forecast should be refetched for a new location
#[wasm_bindgen]
pub fn coordinates_changed(old_lat: f64, old_lon: f64, new_lat: f64, new_lon: f64) -> bool {
    Coordinates::new(old_lat, old_lon).differs_from(
        &Coordinates::new(new_lat, new_lon),
        DEFAULT_COORDINATE_THRESHOLD,
    )
}

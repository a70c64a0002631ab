//! Validation utilities for forecast inputs

use crate::models::HourlySample;
use crate::types::Coordinates;

// ============================================================================
// Location Validations
// ============================================================================

/// Validate latitude/longitude ranges
pub fn validate_coordinates(coords: &Coordinates) -> Result<(), &'static str> {
    if !coords.latitude.is_finite() || !coords.longitude.is_finite() {
        return Err("Coordinates must be finite numbers");
    }
    if coords.latitude < -90.0 || coords.latitude > 90.0 {
        return Err("Latitude must be between -90 and 90");
    }
    if coords.longitude < -180.0 || coords.longitude > 180.0 {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// The mobile app reports (0, 0) while no location fix is available
pub fn is_unset_location(coords: &Coordinates) -> bool {
    coords.latitude == 0.0 || coords.longitude == 0.0
}

// ============================================================================
// Forecast Series Validations
// ============================================================================

/// Length of the usable prefix of a series: strictly ascending, no duplicates
pub fn ordered_prefix_len(samples: &[HourlySample]) -> usize {
    samples
        .windows(2)
        .position(|pair| pair[1].time <= pair[0].time)
        .map(|i| i + 1)
        .unwrap_or(samples.len())
}

/// Trim a series to its strictly ascending prefix
pub fn truncate_unordered(samples: &mut Vec<HourlySample>) {
    let len = ordered_prefix_len(samples);
    samples.truncate(len);
}

/// Length shared by every column of a columnar forecast
pub fn aligned_len(columns: &[usize]) -> usize {
    columns.iter().copied().min().unwrap_or(0)
}

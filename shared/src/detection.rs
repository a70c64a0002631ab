//! Transition detector
//!
//! Scans consecutive forecast hours and turns significant changes (rain
//! onset or offset, large temperature swings, weather regime changes) into
//! [`Prediction`]s carrying the time a notification should fire.
//!
//! Detection is pure: the same `(samples, now)` always yields the same
//! predictions, and nothing outside the arguments is read.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Conditions, HourlySample, Prediction, PredictionKind, Priority};
use crate::wmo;

/// Number of upcoming hour pairs examined (the next 24 hours)
pub const MAX_PAIRS: usize = 24;

/// Predictions are only scheduled this far ahead
pub const SCHEDULING_HORIZON_HOURS: i64 = 24;

/// Below this precipitation probability an hour counts as dry
pub const DRY_PROBABILITY: u8 = 30;

/// At or above this precipitation probability an hour counts as wet
pub const WET_PROBABILITY: u8 = 60;

/// Minimum hour-to-hour swing in °C for a temperature alert
pub const TEMPERATURE_SWING_C: f64 = 8.0;

/// WMO codes further apart than this count as a regime change.
///
/// WMO codes are grouped by category rather than ordered by severity, so
/// this is a coarse proxy that misses some changes (e.g. 61 -> 71) and
/// flags others that matter little. Kept as is for parity with the app.
pub const WEATHER_CODE_DISTANCE: u32 = 10;

/// One detection rule: trigger, lead-time window and notify-before offset
struct Rule {
    kind: PredictionKind,
    /// Exclusive bounds on minutes until the transition
    min_lead: i64,
    max_lead: i64,
    notify_before: i64,
    priority: Priority,
    trigger: fn(&HourlySample, &HourlySample) -> bool,
}

const RULES: [Rule; 5] = [
    Rule {
        kind: PredictionKind::RainStarting,
        min_lead: 30,
        max_lead: 180,
        notify_before: 30,
        priority: Priority::High,
        trigger: rain_starts,
    },
    Rule {
        kind: PredictionKind::RainStopping,
        min_lead: 30,
        max_lead: 180,
        notify_before: 15,
        priority: Priority::Medium,
        trigger: rain_stops,
    },
    Rule {
        kind: PredictionKind::TempDrop,
        min_lead: 60,
        max_lead: 240,
        notify_before: 60,
        priority: Priority::High,
        trigger: temperature_drops,
    },
    Rule {
        kind: PredictionKind::TempRise,
        min_lead: 60,
        max_lead: 240,
        notify_before: 60,
        priority: Priority::Medium,
        trigger: temperature_rises,
    },
    Rule {
        kind: PredictionKind::WeatherChange,
        min_lead: 30,
        max_lead: 180,
        notify_before: 30,
        priority: Priority::Medium,
        trigger: regime_changes,
    },
];

fn rain_starts(current: &HourlySample, next: &HourlySample) -> bool {
    current.precipitation_probability < DRY_PROBABILITY
        && next.precipitation_probability >= WET_PROBABILITY
}

fn rain_stops(current: &HourlySample, next: &HourlySample) -> bool {
    current.precipitation_probability >= WET_PROBABILITY
        && next.precipitation_probability < DRY_PROBABILITY
}

fn temperature_drops(current: &HourlySample, next: &HourlySample) -> bool {
    current.temperature_c - next.temperature_c >= TEMPERATURE_SWING_C
}

fn temperature_rises(current: &HourlySample, next: &HourlySample) -> bool {
    next.temperature_c - current.temperature_c >= TEMPERATURE_SWING_C
}

fn regime_changes(current: &HourlySample, next: &HourlySample) -> bool {
    current.weather_code != next.weather_code
        && current.weather_code.abs_diff(next.weather_code) > WEATHER_CODE_DISTANCE
}

/// Detect every transition worth a notification in `samples`.
///
/// `samples` must be ordered by ascending time. Pairs whose first hour is
/// already behind `now` are ignored and do not count towards
/// [`MAX_PAIRS`]. One hour pair may yield several predictions when more
/// than one rule matches.
pub fn detect(samples: &[HourlySample], now: DateTime<Utc>) -> Vec<Prediction> {
    let mut predictions = Vec::new();

    let upcoming = samples
        .windows(2)
        .filter(|pair| pair[0].time >= now)
        .take(MAX_PAIRS);

    for pair in upcoming {
        let (current, next) = (&pair[0], &pair[1]);
        let lead = lead_minutes(next.time, now);

        for rule in &RULES {
            if !(rule.trigger)(current, next) {
                continue;
            }
            if lead <= rule.min_lead || lead >= rule.max_lead {
                continue;
            }
            predictions.push(build_prediction(rule, current, next, lead, now));
        }
    }

    predictions
}

/// Whether a prediction fires strictly inside `(now, now + horizon)`
pub fn within_horizon(prediction: &Prediction, now: DateTime<Utc>, horizon: Duration) -> bool {
    prediction.scheduled_for > now && prediction.scheduled_for < now + horizon
}

/// Whole minutes from `now` until `at`, rounded to the nearest minute
fn lead_minutes(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (at - now).num_seconds();
    (seconds as f64 / 60.0).round() as i64
}

fn build_prediction(
    rule: &Rule,
    current: &HourlySample,
    next: &HourlySample,
    lead: i64,
    now: DateTime<Utc>,
) -> Prediction {
    let current_conditions = conditions(current, None);
    let future_probability = match rule.kind {
        PredictionKind::RainStarting => Some(next.precipitation_probability),
        _ => None,
    };
    let future_conditions = conditions(next, future_probability);
    let message = fallback_message(rule.kind, &current_conditions, &future_conditions, lead);

    Prediction {
        kind: rule.kind,
        scheduled_for: now + Duration::minutes(lead - rule.notify_before),
        current_conditions,
        future_conditions,
        message,
        priority: rule.priority,
    }
}

fn conditions(sample: &HourlySample, precipitation_probability: Option<u8>) -> Conditions {
    Conditions {
        temperature: sample.rounded_temperature(),
        weather_code: sample.weather_code,
        description: wmo::description(sample.weather_code).to_string(),
        precipitation_probability,
    }
}

/// Deterministic notification text for a transition
pub fn fallback_message(
    kind: PredictionKind,
    current: &Conditions,
    future: &Conditions,
    lead_minutes: i64,
) -> String {
    match kind {
        PredictionKind::RainStarting => format!(
            "☔ Rain expected in {}min ({}% chance) - grab an umbrella!",
            lead_minutes,
            future.precipitation_probability.unwrap_or_default()
        ),
        PredictionKind::RainStopping => format!(
            "🌤️ Rain clearing up in {}min - great time for a walk!",
            lead_minutes
        ),
        PredictionKind::TempDrop => format!(
            "🥶 Temperature dropping from {}°C to {}°C - dress warmly!",
            current.temperature, future.temperature
        ),
        PredictionKind::TempRise => format!(
            "🌡️ Warming up from {}°C to {}°C - perfect day ahead!",
            current.temperature, future.temperature
        ),
        PredictionKind::WeatherChange => format!(
            "{} Weather changing from {} to {}",
            wmo::emoji(future.weather_code),
            current.description,
            future.description
        ),
    }
}

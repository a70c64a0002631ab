//! Notification preference models

use serde::{Deserialize, Serialize};

use super::prediction::{AlertCategory, PredictionKind};

/// User toggles that gate prediction notifications
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    /// Global switch for every notification
    pub enabled: bool,
    /// Master switch for predictive weather alerts
    pub weather_alerts: bool,
    pub rain_alerts: bool,
    pub temperature_alerts: bool,
    pub condition_alerts: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            weather_alerts: true,
            rain_alerts: true,
            temperature_alerts: true,
            condition_alerts: true,
        }
    }
}

impl NotificationPreferences {
    /// Whether predictive alerts may be scheduled at all
    pub fn alerts_enabled(&self) -> bool {
        self.enabled && self.weather_alerts
    }

    pub fn category_enabled(&self, category: AlertCategory) -> bool {
        match category {
            AlertCategory::Rain => self.rain_alerts,
            AlertCategory::Temperature => self.temperature_alerts,
            AlertCategory::Condition => self.condition_alerts,
        }
    }

    pub fn allows(&self, kind: PredictionKind) -> bool {
        self.alerts_enabled() && self.category_enabled(kind.category())
    }
}

/// Partial update of notification preferences
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesInput {
    pub enabled: Option<bool>,
    pub weather_alerts: Option<bool>,
    pub rain_alerts: Option<bool>,
    pub temperature_alerts: Option<bool>,
    pub condition_alerts: Option<bool>,
}

impl NotificationPreferences {
    pub fn apply(&mut self, input: UpdatePreferencesInput) {
        if let Some(v) = input.enabled {
            self.enabled = v;
        }
        if let Some(v) = input.weather_alerts {
            self.weather_alerts = v;
        }
        if let Some(v) = input.rain_alerts {
            self.rain_alerts = v;
        }
        if let Some(v) = input.temperature_alerts {
            self.temperature_alerts = v;
        }
        if let Some(v) = input.condition_alerts {
            self.condition_alerts = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_allow_everything() {
        let prefs = NotificationPreferences::default();
        for kind in PredictionKind::ALL {
            assert!(prefs.allows(kind));
        }
    }

    #[test]
    fn test_global_switch_overrides_categories() {
        let prefs = NotificationPreferences {
            enabled: false,
            ..Default::default()
        };
        assert!(!prefs.alerts_enabled());
        assert!(!prefs.allows(PredictionKind::RainStarting));
    }

    #[test]
    fn test_category_toggle_is_independent() {
        let prefs = NotificationPreferences {
            rain_alerts: false,
            ..Default::default()
        };
        assert!(!prefs.allows(PredictionKind::RainStarting));
        assert!(!prefs.allows(PredictionKind::RainStopping));
        assert!(prefs.allows(PredictionKind::TempDrop));
        assert!(prefs.allows(PredictionKind::WeatherChange));
    }

    #[test]
    fn test_partial_update() {
        let mut prefs = NotificationPreferences::default();
        prefs.apply(UpdatePreferencesInput {
            temperature_alerts: Some(false),
            ..Default::default()
        });
        assert!(prefs.enabled);
        assert!(!prefs.temperature_alerts);
        assert!(prefs.rain_alerts);
    }
}

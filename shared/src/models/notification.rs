//! Scheduled notification models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::prediction::{PredictionKind, Priority};

/// Category tag attached to every prediction notification
pub const WEATHER_PREDICTION_CATEGORY: &str = "weather_prediction";

/// Fixed suffix of every prediction notification title
pub const WEATHER_ALERT_TITLE: &str = "Weather Alert";

/// Extra data delivered alongside a notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetadata {
    pub category: String,
    pub kind: PredictionKind,
    pub priority: Priority,
}

/// A composed notification ready to be handed to the delivery platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    pub title: String,
    pub body: String,
    pub deliver_at: DateTime<Utc>,
    pub metadata: NotificationMetadata,
}

/// Whether the user allowed the app to post notifications
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    #[default]
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Outcome of a scheduling pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Scheduled,
    NotificationsDisabled,
    PermissionNotGranted,
}

/// Aggregate counts of a scheduling pass
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReport {
    pub status: ScheduleStatus,
    pub scheduled: usize,
    pub skipped: usize,
}

impl ScheduleReport {
    /// A pass that was gated before doing any work
    pub fn gated(status: ScheduleStatus) -> Self {
        Self {
            status,
            scheduled: 0,
            skipped: 0,
        }
    }
}

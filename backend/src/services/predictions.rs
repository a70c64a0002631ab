//! Prediction service
//!
//! Entry point used by the API: recomputes predictions over the cached
//! forecast and drives the notification scheduler.

use serde::{Deserialize, Serialize};
use shared::{detect, Coordinates, Prediction, ScheduleStatus};
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::AppResult;
use crate::services::forecast_store::ForecastStore;
use crate::services::scheduler::NotificationScheduler;

/// Outcome of a scheduling request, as shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predictions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<usize>,
}

impl ScheduleResponse {
    fn message_only(success: bool, message: &str) -> Self {
        Self {
            success,
            message: message.to_string(),
            predictions: None,
            scheduled: None,
            skipped: None,
        }
    }
}

#[derive(Clone)]
pub struct PredictionService {
    forecasts: Arc<ForecastStore>,
    scheduler: Arc<NotificationScheduler>,
    clock: Arc<dyn Clock>,
}

impl PredictionService {
    pub fn new(
        forecasts: Arc<ForecastStore>,
        scheduler: Arc<NotificationScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            forecasts,
            scheduler,
            clock,
        }
    }

    /// Predictions over the last known forecast, without scheduling anything
    pub fn get_predictions(&self) -> Vec<Prediction> {
        detect(&self.forecasts.latest_samples(), self.clock.now())
    }

    /// Refresh the forecast for `coords`, then recompute predictions
    pub async fn refresh(&self, coords: Coordinates) -> AppResult<Vec<Prediction>> {
        let samples = self.forecasts.refresh(coords).await?;
        Ok(detect(&samples, self.clock.now()))
    }

    /// Schedule notifications for the current predictions
    pub async fn schedule_ai_prediction_notifications(&self) -> ScheduleResponse {
        let predictions = self.get_predictions();

        let report = match self.scheduler.schedule_all(&predictions).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("Error scheduling prediction notifications: {}", e);
                return ScheduleResponse::message_only(false, "Failed to schedule predictions");
            }
        };

        match report.status {
            ScheduleStatus::NotificationsDisabled => {
                ScheduleResponse::message_only(false, "Notifications disabled")
            }
            ScheduleStatus::PermissionNotGranted => {
                ScheduleResponse::message_only(false, "Notification permission not granted")
            }
            ScheduleStatus::Scheduled if predictions.is_empty() => {
                ScheduleResponse::message_only(true, "No significant weather changes predicted")
            }
            ScheduleStatus::Scheduled => ScheduleResponse {
                success: true,
                message: format!("Scheduled {} weather predictions", report.scheduled),
                predictions: Some(predictions.len()),
                scheduled: Some(report.scheduled),
                skipped: Some(report.skipped),
            },
        }
    }

    /// Clear all pending notifications; false when the platform failed
    pub async fn cancel_all_notifications(&self) -> bool {
        match self.scheduler.cancel_all().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error cancelling notifications: {}", e);
                false
            }
        }
    }

    pub fn scheduler(&self) -> &NotificationScheduler {
        &self.scheduler
    }

    pub fn forecasts(&self) -> &ForecastStore {
        &self.forecasts
    }
}

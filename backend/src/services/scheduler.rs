//! Notification scheduler
//!
//! Owns the set of pending prediction notifications. Every scheduling pass
//! replaces the previous batch in full: pending notifications are cancelled,
//! then each prediction inside the horizon is composed and handed to the
//! delivery platform.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::{
    within_horizon, PermissionStatus, Prediction, ScheduleReport, ScheduleStatus,
    ScheduledNotification,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::services::composer::NotificationComposer;
use crate::services::preferences::PreferencesStore;

pub type NotificationHandle = Uuid;

/// A notification waiting for its delivery time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingNotification {
    pub id: NotificationHandle,
    #[serde(flatten)]
    pub notification: ScheduledNotification,
}

/// Delivery primitive for scheduled notifications
#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    async fn permission(&self) -> PermissionStatus;

    /// Queue a notification for delivery at `notification.deliver_at`
    async fn schedule(&self, notification: ScheduledNotification) -> AppResult<NotificationHandle>;

    async fn cancel_all(&self) -> AppResult<()>;

    async fn list_pending(&self) -> Vec<PendingNotification>;
}

// ============================================================================
// In-process Platform
// ============================================================================

/// Pending notifications kept in memory, ordered by delivery time
pub struct InMemoryPlatform {
    clock: Arc<dyn Clock>,
    permission: RwLock<PermissionStatus>,
    pending: RwLock<Vec<PendingNotification>>,
}

impl InMemoryPlatform {
    pub fn new(clock: Arc<dyn Clock>, permission: PermissionStatus) -> Self {
        Self {
            clock,
            permission: RwLock::new(permission),
            pending: RwLock::new(Vec::new()),
        }
    }

    pub fn set_permission(&self, status: PermissionStatus) {
        *self.permission.write() = status;
        tracing::info!(?status, "Notification permission changed");
    }

    /// Remove and return every notification due at or before `now`
    pub fn take_due(&self, now: DateTime<Utc>) -> Vec<PendingNotification> {
        let mut pending = self.pending.write();
        let due = pending.partition_point(|p| p.notification.deliver_at <= now);
        pending.drain(..due).collect()
    }
}

#[async_trait]
impl NotificationPlatform for InMemoryPlatform {
    async fn permission(&self) -> PermissionStatus {
        *self.permission.read()
    }

    async fn schedule(&self, notification: ScheduledNotification) -> AppResult<NotificationHandle> {
        if notification.deliver_at <= self.clock.now() {
            return Err(AppError::NotificationPlatform(
                "Trigger time must be in the future".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        let mut pending = self.pending.write();
        let at = pending.partition_point(|p| p.notification.deliver_at <= notification.deliver_at);
        pending.insert(at, PendingNotification { id, notification });
        Ok(id)
    }

    async fn cancel_all(&self) -> AppResult<()> {
        let mut pending = self.pending.write();
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "Cancelling pending notifications");
        }
        pending.clear();
        Ok(())
    }

    async fn list_pending(&self) -> Vec<PendingNotification> {
        self.pending.read().clone()
    }
}

// ============================================================================
// Scheduler
// ============================================================================

pub struct NotificationScheduler {
    platform: Arc<dyn NotificationPlatform>,
    preferences: Arc<dyn PreferencesStore>,
    composer: NotificationComposer,
    clock: Arc<dyn Clock>,
    horizon: Duration,
    batch: tokio::sync::Mutex<()>,
}

impl NotificationScheduler {
    pub fn new(
        platform: Arc<dyn NotificationPlatform>,
        preferences: Arc<dyn PreferencesStore>,
        composer: NotificationComposer,
        clock: Arc<dyn Clock>,
        horizon: Duration,
    ) -> Self {
        Self {
            platform,
            preferences,
            composer,
            clock,
            horizon,
            batch: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace all pending notifications with ones for `predictions`.
    ///
    /// Disabled preferences or a missing permission end the pass before any
    /// text is generated. Predictions outside the horizon, in a disabled
    /// category, or rejected by the platform are counted as skipped.
    pub async fn schedule_all(&self, predictions: &[Prediction]) -> AppResult<ScheduleReport> {
        let _batch = self.batch.lock().await;

        let preferences = self.preferences.get();
        if !preferences.alerts_enabled() {
            tracing::debug!("Prediction alerts disabled, nothing scheduled");
            return Ok(ScheduleReport::gated(ScheduleStatus::NotificationsDisabled));
        }

        let permission = self.platform.permission().await;
        if !permission.is_granted() {
            tracing::debug!(?permission, "Notification permission not granted");
            return Ok(ScheduleReport::gated(ScheduleStatus::PermissionNotGranted));
        }

        self.platform.cancel_all().await?;

        let mut scheduled = 0;
        let mut skipped = 0;
        for prediction in predictions {
            let kind = prediction.kind.as_str();

            if !within_horizon(prediction, self.clock.now(), self.horizon) {
                tracing::debug!(kind, scheduled_for = %prediction.scheduled_for, "Outside scheduling horizon");
                skipped += 1;
                continue;
            }
            if !preferences.allows(prediction.kind) {
                tracing::debug!(kind, "Alert category disabled");
                skipped += 1;
                continue;
            }

            let notification = self.composer.compose(prediction).await;
            match self.platform.schedule(notification).await {
                Ok(id) => {
                    tracing::debug!(kind, %id, deliver_at = %prediction.scheduled_for, "Notification scheduled");
                    scheduled += 1;
                }
                Err(e) => {
                    tracing::warn!(kind, "Platform rejected notification: {}", e);
                    skipped += 1;
                }
            }
        }

        tracing::info!(scheduled, skipped, "Prediction notifications scheduled");
        Ok(ScheduleReport {
            status: ScheduleStatus::Scheduled,
            scheduled,
            skipped,
        })
    }

    /// Clear every pending notification
    pub async fn cancel_all(&self) -> AppResult<()> {
        self.platform.cancel_all().await
    }

    pub async fn count_pending(&self) -> usize {
        self.platform.list_pending().await.len()
    }

    pub async fn pending(&self) -> Vec<PendingNotification> {
        self.platform.list_pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;
    use shared::{NotificationMetadata, PredictionKind, Priority, WEATHER_PREDICTION_CATEGORY};

    fn notification(deliver_at: DateTime<Utc>) -> ScheduledNotification {
        ScheduledNotification {
            title: "☀️ Weather Alert".to_string(),
            body: "Clear skies ahead".to_string(),
            deliver_at,
            metadata: NotificationMetadata {
                category: WEATHER_PREDICTION_CATEGORY.to_string(),
                kind: PredictionKind::WeatherChange,
                priority: Priority::Medium,
            },
        }
    }

    fn platform() -> (Arc<ManualClock>, InMemoryPlatform) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(now));
        (clock.clone(), InMemoryPlatform::new(clock, PermissionStatus::Granted))
    }

    #[tokio::test]
    async fn test_platform_rejects_past_triggers() {
        let (clock, platform) = platform();
        assert!(platform.schedule(notification(clock.now())).await.is_err());
        assert!(platform.list_pending().await.is_empty());
    }

    #[tokio::test]
    async fn test_platform_keeps_delivery_order() {
        let (clock, platform) = platform();
        let now = clock.now();
        platform.schedule(notification(now + Duration::hours(3))).await.unwrap();
        platform.schedule(notification(now + Duration::hours(1))).await.unwrap();
        platform.schedule(notification(now + Duration::hours(2))).await.unwrap();

        let times: Vec<_> = platform
            .list_pending()
            .await
            .iter()
            .map(|p| p.notification.deliver_at)
            .collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_take_due_drains_only_due() {
        let (clock, platform) = platform();
        let now = clock.now();
        platform.schedule(notification(now + Duration::minutes(30))).await.unwrap();
        platform.schedule(notification(now + Duration::hours(2))).await.unwrap();

        assert!(platform.take_due(now).is_empty());
        let due = platform.take_due(now + Duration::hours(1));
        assert_eq!(due.len(), 1);
        assert_eq!(platform.list_pending().await.len(), 1);
    }
}

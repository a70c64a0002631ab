//! Notification composer
//!
//! Turns a prediction into a deliverable notification. Generated text is
//! best-effort: any failure, timeout or empty answer falls back to the
//! prediction's own message.

use async_trait::async_trait;
use shared::{
    wmo, NotificationMetadata, Prediction, ScheduledNotification, WEATHER_ALERT_TITLE,
    WEATHER_PREDICTION_CATEGORY,
};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_COMPOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Produces notification text for a prediction
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prediction: &Prediction) -> AppResult<String>;
}

#[derive(Clone)]
pub struct NotificationComposer {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl NotificationComposer {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn compose(&self, prediction: &Prediction) -> ScheduledNotification {
        ScheduledNotification {
            title: title_for(prediction),
            body: self.body_for(prediction).await,
            deliver_at: prediction.scheduled_for,
            metadata: NotificationMetadata {
                category: WEATHER_PREDICTION_CATEGORY.to_string(),
                kind: prediction.kind,
                priority: prediction.priority,
            },
        }
    }

    async fn body_for(&self, prediction: &Prediction) -> String {
        let kind = prediction.kind.as_str();
        match self.generate_within_timeout(prediction).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!(kind, "Generated notification text was empty, using fallback");
                prediction.message.clone()
            }
            Err(e) => {
                tracing::warn!(kind, "Notification text generation failed: {}", e);
                prediction.message.clone()
            }
        }
    }

    async fn generate_within_timeout(&self, prediction: &Prediction) -> AppResult<String> {
        tokio::time::timeout(self.timeout, self.generator.generate(prediction))
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "Notification text generation ({}ms)",
                    self.timeout.as_millis()
                ))
            })?
    }
}

/// "{emoji} Weather Alert", keyed on the conditions after the transition
pub fn title_for(prediction: &Prediction) -> String {
    format!(
        "{} {}",
        wmo::emoji(prediction.future_conditions.weather_code),
        WEATHER_ALERT_TITLE
    )
}

//! Notification composer tests

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::{
    Conditions, Prediction, PredictionKind, Priority, WEATHER_PREDICTION_CATEGORY,
};
use std::sync::Arc;
use weather_assistant_backend::error::{AppError, AppResult};
use weather_assistant_backend::services::composer::title_for;
use weather_assistant_backend::services::{NotificationComposer, TextGenerator};

fn prediction(kind: PredictionKind, future_code: i32) -> Prediction {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    Prediction {
        kind,
        scheduled_for: now + Duration::minutes(30),
        current_conditions: Conditions {
            temperature: 16,
            weather_code: 2,
            description: "Partly cloudy".to_string(),
            precipitation_probability: None,
        },
        future_conditions: Conditions {
            temperature: 15,
            weather_code: future_code,
            description: shared::wmo::description(future_code).to_string(),
            precipitation_probability: Some(70),
        },
        message: "☔ Rain expected in 60min (70% chance) - grab an umbrella!".to_string(),
        priority: Priority::High,
    }
}

enum Behaviour {
    Reply(&'static str),
    Fail,
    Hang,
}

struct ScriptedGenerator(Behaviour);

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prediction: &Prediction) -> AppResult<String> {
        match self.0 {
            Behaviour::Reply(text) => Ok(text.to_string()),
            Behaviour::Fail => Err(AppError::AiService("503 - overloaded".into())),
            Behaviour::Hang => {
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
        }
    }
}

fn composer(behaviour: Behaviour) -> NotificationComposer {
    NotificationComposer::new(
        Arc::new(ScriptedGenerator(behaviour)),
        std::time::Duration::from_millis(50),
    )
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_text_becomes_body() {
        let p = prediction(PredictionKind::RainStarting, 61);
        let notification = composer(Behaviour::Reply("  Umbrella time in an hour!\n"))
            .compose(&p)
            .await;

        assert_eq!(notification.body, "Umbrella time in an hour!");
        assert_eq!(notification.title, "🌧️ Weather Alert");
        assert_eq!(notification.deliver_at, p.scheduled_for);
        assert_eq!(notification.metadata.category, WEATHER_PREDICTION_CATEGORY);
        assert_eq!(notification.metadata.kind, PredictionKind::RainStarting);
        assert_eq!(notification.metadata.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_message() {
        let p = prediction(PredictionKind::RainStarting, 61);
        let notification = composer(Behaviour::Fail).compose(&p).await;
        assert_eq!(notification.body, p.message);
    }

    #[tokio::test]
    async fn test_empty_text_falls_back_to_message() {
        let p = prediction(PredictionKind::RainStarting, 61);
        let notification = composer(Behaviour::Reply("   ")).compose(&p).await;
        assert_eq!(notification.body, p.message);
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_message() {
        let p = prediction(PredictionKind::RainStarting, 61);
        let started = std::time::Instant::now();
        let notification = composer(Behaviour::Hang).compose(&p).await;

        assert_eq!(notification.body, p.message);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_title_uses_future_conditions() {
        assert_eq!(title_for(&prediction(PredictionKind::WeatherChange, 95)), "⛈️ Weather Alert");
        assert_eq!(title_for(&prediction(PredictionKind::TempRise, 0)), "☀️ Weather Alert");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        /// A failing generator always yields the deterministic message
        #[test]
        fn prop_failure_body_is_message(
            kind_index in 0usize..5,
            code in prop::sample::select(vec![0, 2, 3, 45, 61, 71, 95]),
        ) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let p = prediction(PredictionKind::ALL[kind_index], code);
            let notification = runtime.block_on(composer(Behaviour::Fail).compose(&p));

            prop_assert_eq!(&notification.body, &p.message);
            prop_assert!(notification.title.ends_with("Weather Alert"));
        }
    }
}

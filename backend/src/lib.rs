//! Weather Assistant - Backend
//!
//! Forecast proxy, weather assistant and predictive weather notifications.

use axum::{routing::get, Router};
use chrono::Duration;
use shared::PermissionStatus;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod clock;
pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use clock::{Clock, SystemClock};
use error::AppResult;
use external::{ChatClient, WeatherClient};
use services::{
    AssistantService, CachePolicy, ForecastStore, InMemoryPlatform, InMemoryPreferences,
    NotificationComposer, NotificationScheduler, PredictionService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub weather: WeatherClient,
    pub assistant: Arc<AssistantService>,
    pub forecasts: Arc<ForecastStore>,
    pub platform: Arc<InMemoryPlatform>,
    pub preferences: Arc<InMemoryPreferences>,
    pub predictions: PredictionService,
}

impl AppState {
    /// Wire every service against the wall clock
    pub fn new(config: Config) -> AppResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let weather = WeatherClient::new(&config.weather)?;
        let chat = ChatClient::new(&config.ai)?;
        if !chat.is_configured() {
            tracing::warn!("AI API key not set, assistant will answer with fallback text");
        }

        let assistant = Arc::new(AssistantService::new(
            chat,
            clock.clone(),
            Duration::minutes(config.ai.tip_cache_minutes),
        ));

        let forecasts = Arc::new(ForecastStore::new(
            Arc::new(weather.clone()),
            clock.clone(),
            CachePolicy::from(&config.forecast_cache),
        ));

        let permission = if config.notifications.permission_granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Undetermined
        };
        let platform = Arc::new(InMemoryPlatform::new(clock.clone(), permission));
        let preferences = Arc::new(InMemoryPreferences::default());

        let composer = NotificationComposer::new(
            assistant.clone(),
            config.notifications.composer_timeout(),
        );
        let scheduler = Arc::new(NotificationScheduler::new(
            platform.clone(),
            preferences.clone(),
            composer,
            clock.clone(),
            config.notifications.horizon(),
        ));
        let predictions = PredictionService::new(forecasts.clone(), scheduler, clock.clone());

        Ok(Self {
            config: Arc::new(config),
            clock,
            weather,
            assistant,
            forecasts,
            platform,
            preferences,
            predictions,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Weather Assistant API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

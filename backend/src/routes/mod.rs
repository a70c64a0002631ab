//! Route definitions for the weather assistant API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Forecast proxy
        .nest("/weather", weather_routes())
        // Weather assistant
        .route("/ai", post(handlers::ask_assistant))
        // Predictions and their notifications
        .nest("/predictions", prediction_routes())
        .nest("/notifications", notification_routes())
        .route(
            "/preferences",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
}

/// Forecast proxy routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/current", get(handlers::get_current_weather))
        .route("/hourly", get(handlers::get_hourly_weather))
        .route("/daily", get(handlers::get_daily_weather))
}

/// Prediction routes
fn prediction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_predictions))
        .route("/refresh", post(handlers::refresh_predictions))
        .route("/schedule", post(handlers::schedule_predictions))
}

/// Notification routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", delete(handlers::cancel_all))
        .route("/pending", get(handlers::list_pending))
        .route("/permission", put(handlers::set_permission))
}

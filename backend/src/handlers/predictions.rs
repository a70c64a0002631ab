//! HTTP handlers for weather predictions

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{Coordinates, Prediction};
use validator::Validate;

use crate::error::AppResult;
use crate::services::ScheduleResponse;
use crate::AppState;

/// Location to refresh the forecast for
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshInput {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lon: f64,
}

/// Predictions over the cached forecast
pub async fn list_predictions(State(state): State<AppState>) -> Json<Vec<Prediction>> {
    Json(state.predictions.get_predictions())
}

/// Refresh the cached forecast and return fresh predictions
pub async fn refresh_predictions(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<Vec<Prediction>>> {
    input.validate()?;
    let predictions = state
        .predictions
        .refresh(Coordinates::new(input.lat, input.lon))
        .await?;
    Ok(Json(predictions))
}

/// Schedule notifications for the current predictions
pub async fn schedule_predictions(State(state): State<AppState>) -> Json<ScheduleResponse> {
    Json(state.predictions.schedule_ai_prediction_notifications().await)
}

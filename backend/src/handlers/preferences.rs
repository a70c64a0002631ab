//! HTTP handlers for notification preferences

use axum::{extract::State, Json};
use shared::{NotificationPreferences, UpdatePreferencesInput};

use crate::services::PreferencesStore;
use crate::AppState;

pub async fn get_preferences(State(state): State<AppState>) -> Json<NotificationPreferences> {
    Json(state.preferences.get())
}

/// Partial update; omitted toggles keep their value
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(input): Json<UpdatePreferencesInput>,
) -> Json<NotificationPreferences> {
    Json(state.preferences.update(input))
}

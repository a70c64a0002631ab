//! HTTP handlers for pending notifications

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use shared::PermissionStatus;

use crate::services::scheduler::PendingNotification;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PendingResponse {
    pub count: usize,
    pub notifications: Vec<PendingNotification>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionInput {
    pub status: PermissionStatus,
}

/// List notifications waiting for delivery
pub async fn list_pending(State(state): State<AppState>) -> Json<PendingResponse> {
    let notifications = state.predictions.scheduler().pending().await;
    Json(PendingResponse {
        count: notifications.len(),
        notifications,
    })
}

/// Cancel every pending notification
pub async fn cancel_all(State(state): State<AppState>) -> Json<CancelResponse> {
    Json(CancelResponse {
        success: state.predictions.cancel_all_notifications().await,
    })
}

/// Record the device's notification permission
pub async fn set_permission(
    State(state): State<AppState>,
    Json(input): Json<PermissionInput>,
) -> Json<PermissionInput> {
    state.platform.set_permission(input.status);
    Json(input)
}

//! HTTP handler for the weather assistant

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::assistant::{AssistantRequest, AssistantResponse};
use crate::AppState;

/// Ask the assistant for a tip, a notification line, an alert or a chat reply
pub async fn ask_assistant(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> AppResult<Json<AssistantResponse>> {
    let response = state.assistant.respond(request).await?;
    Ok(Json(response))
}

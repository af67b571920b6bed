//! Session handlers.
//!
//! Endpoints:
//! - POST /api/clear                    - Clear a session's history
//! - GET  /api/sessions/{id}/messages   - Stored history of a session

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::{Value, json};

use colloquy_types::chat::ChatMessage;

use crate::http::error::AppError;
use crate::state::AppState;

const SESSION_ID_REQUIRED: &str = "Session ID is required";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
}

/// POST /api/clear - `{ sessionId }` -> `{ success: true }`.
pub async fn clear(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let session_id = body
        .get("sessionId")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest(SESSION_ID_REQUIRED.to_string()))?;

    state
        .chat_service
        .clear(session_id)
        .await
        .map_err(|e| AppError::from_chat(e, "Failed to clear conversation"))?;

    Ok(Json(json!({ "success": true })))
}

/// GET /api/sessions/{id}/messages - Stored messages, oldest first.
///
/// Unknown sessions return an empty list.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<MessagesResponse>, AppError> {
    let messages = state
        .chat_service
        .history(&session_id)
        .await
        .map_err(|e| AppError::from_chat(e, "Failed to load conversation"))?;

    Ok(Json(MessagesResponse {
        session_id,
        messages,
    }))
}

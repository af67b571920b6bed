//! Chat turn handler.
//!
//! POST /api/chat - `{ message, sessionId? }` -> `{ reply, sessionId }`

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use serde_json::Value;

use crate::http::error::AppError;
use crate::state::AppState;

const MESSAGE_REQUIRED: &str = "Message is required";
const CHAT_FAILED: &str = "Failed to process chat message";

/// Successful chat response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
}

/// POST /api/chat - Run one chat turn.
///
/// `message` must be a non-blank string. A missing, non-string, or blank
/// `sessionId` starts a new session whose key is returned.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest(MESSAGE_REQUIRED.to_string()))?;
    let session_id = body
        .get("sessionId")
        .and_then(Value::as_str)
        .map(str::to_string);

    let turn = state
        .chat_service
        .handle_turn(session_id, message.to_string())
        .await
        .map_err(|e| AppError::from_chat(e, CHAT_FAILED))?;

    Ok(Json(ChatResponse {
        reply: turn.reply,
        session_id: turn.session_id,
    }))
}

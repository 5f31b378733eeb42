//! Chat endpoint.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::orchestrator;
use crate::state::AppState;
use sc_protocol::{ChatRequest, ChatResponse};

/// POST /api/chat/ — answer a product question.
///
/// Always 200 with a reply body once the request itself is valid; upstream
/// failures show up as the apology plus the `degraded` marker, never as an
/// error status.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = req.message.trim();
    if message.is_empty() {
        // Validated before any upstream call.
        return Err(ApiError::Unprocessable("message must not be empty".into()));
    }

    let request_id = Uuid::now_v7();
    tracing::info!(request_id = %request_id, chars = message.len(), "chat request");

    let outcome = orchestrator::handle(&state, message).await;

    match outcome.degraded {
        Some(reason) => {
            tracing::warn!(request_id = %request_id, reason = ?reason, "chat request degraded");
            Ok(Json(ChatResponse::degraded(outcome.reply, reason)))
        }
        None => Ok(Json(ChatResponse::answered(outcome.reply))),
    }
}

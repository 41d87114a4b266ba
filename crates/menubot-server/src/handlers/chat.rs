//! Chat endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use crate::dto::{ChatReply, ChatRequest};
use crate::error::AppError;
use crate::services;
use crate::ServerState;

/// Answers a menu question through the agent.
pub async fn chat(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    info!("Chat request: {}...", req.input.get(..50).unwrap_or(&req.input));

    let output = services::chat::answer(state.agent.as_ref(), &req.input).await?;
    Ok(Json(ChatReply { output }))
}

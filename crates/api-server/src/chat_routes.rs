use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use portfolio_store::ChatRecord;
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, AppError, AppState};

const DEFAULT_HISTORY_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    #[serde(default)]
    pub context: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/chat/:user_id", post(chat))
        .route("/api/v1/chat/history/:user_id", get(chat_history))
}

async fn chat(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, AppError> {
    let response = state
        .chat
        .respond(user_id, &request.text, &request.context)
        .await;

    // History recording is best-effort; the reply already exists
    if let Err(e) = state.store.record_chat(user_id, &request.text, &response).await {
        tracing::warn!("Failed to record chat turn for user {}: {}", user_id, e);
    }

    Ok(Json(ApiResponse::success(ChatResponse { response })))
}

async fn chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<ChatRecord>>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 100);
    let records = state.store.chat_history(user_id, limit).await?;

    Ok(Json(ApiResponse::success(records)))
}

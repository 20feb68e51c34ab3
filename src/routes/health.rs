use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "status": "ok",
        "generation_model": state.generation_model,
        "embedding_enabled": state.embedding_enabled,
    });
    (StatusCode::OK, Json(body))
}

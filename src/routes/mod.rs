pub mod docs;
pub mod health;
pub mod questions;

use crate::middleware::{cors::permissive_cors, rate_limit};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn router(state: AppState, public_rps: u32) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json));

    let quiz_api = Router::new()
        .route("/generateQuestions", post(questions::generate_questions))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(public_rps),
            rate_limit::rps_middleware,
        ));

    base_routes
        .merge(quiz_api)
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
}

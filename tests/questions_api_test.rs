use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use trivia_backend::{
    error::{Error, Result},
    models::profile::Profile,
    routes,
    services::{generation_service::TextGenerator, question_service::QuestionService},
    AppState,
};

struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, _prompt: &str, _max_length: usize) -> Result<String> {
        Err(Error::Internal("model offline".into()))
    }
}

struct CannedGenerator {
    text: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str, _max_length: usize) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.to_string())
    }
}

fn app_with(generator: Arc<dyn TextGenerator>, rps: u32) -> Router {
    let state = AppState::with_question_service(
        QuestionService::new(generator),
        "test-model".to_string(),
        false,
    );
    routes::router(state, rps)
}

fn post_json(uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn fixture_profile() -> Profile {
    let raw = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixtures/mock_profiles.json"
    ))
    .expect("read fixture");
    let profiles: Vec<Profile> = serde_json::from_str(&raw).expect("parse fixture");
    profiles.into_iter().next().expect("fixture has a profile")
}

#[tokio::test]
async fn offline_generator_still_returns_full_quiz() {
    let app = app_with(Arc::new(OfflineGenerator), 100);
    let body = json!({
        "userId": "user-001",
        "basename": "alex.base",
        "bio": "A".repeat(200),
        "posts": ["hi", "base hackathon"],
    });

    let resp = app.oneshot(post_json("/generateQuestions", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let questions = body["questions"].as_array().expect("questions array");

    assert_eq!(questions.len(), 15);
    assert_eq!(
        questions[0]["questionText"],
        "What topic does alex.base frequently post about?"
    );
    assert_eq!(questions[0]["options"], json!(["Tech", "Sports", "Music", "Food"]));
    for (i, q) in questions.iter().enumerate() {
        assert_eq!(q["questionId"], (i + 1) as u64);
        assert_eq!(q["stage"], (i / 5 + 1) as u64);
        assert_eq!(q["options"].as_array().unwrap().len(), 4);
        assert_eq!(q["correctAnswer"], 0);
        assert_eq!(q["personalizedContext"], "Based on alex.base's X posts");
    }
}

#[tokio::test]
async fn fixture_profile_uses_generated_text() {
    let generator = Arc::new(CannedGenerator {
        text: "What chain did alex.base deploy on",
        calls: AtomicUsize::new(0),
    });
    let app = app_with(generator.clone(), 100);
    let profile = fixture_profile();
    let body = serde_json::to_value(&profile).unwrap();

    let resp = app.oneshot(post_json("/generateQuestions", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let questions = body["questions"].as_array().unwrap();

    assert_eq!(generator.calls.load(Ordering::SeqCst), 15);
    assert_eq!(questions[0]["questionText"], "What chain did alex.base deploy on?");
    // "base" in the text selects the blockchain options for every slot
    for q in questions {
        assert_eq!(q["options"], json!(["Base", "Ethereum", "Polygon", "Solana"]));
    }
}

#[tokio::test]
async fn empty_basename_is_rejected() {
    let app = app_with(Arc::new(OfflineGenerator), 100);
    let body = json!({ "userId": "u", "basename": "", "bio": "", "posts": [] });

    let resp = app.oneshot(post_json("/generateQuestions", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("basename"));
}

#[tokio::test]
async fn missing_fields_are_rejected_by_extractor() {
    let app = app_with(Arc::new(OfflineGenerator), 100);
    let body = json!({ "userId": "u", "basename": "alex.base" });

    let resp = app.oneshot(post_json("/generateQuestions", &body)).await.unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn oversized_profile_body_is_rejected() {
    let app = app_with(Arc::new(OfflineGenerator), 100);
    let body = json!({
        "userId": "u",
        "basename": "alex.base",
        "bio": "A".repeat(routes::MAX_BODY_BYTES + 1),
        "posts": [],
    });

    let resp = app.oneshot(post_json("/generateQuestions", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn rate_limit_applies_to_quiz_endpoint() {
    let app = app_with(Arc::new(OfflineGenerator), 1);
    let body = json!({ "userId": "u", "basename": "alex.base", "bio": "", "posts": [] });

    let first = app
        .clone()
        .oneshot(post_json("/generateQuestions", &body))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = app.oneshot(post_json("/generateQuestions", &body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = app_with(Arc::new(OfflineGenerator), 100);

    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["generation_model"], "test-model");

    let req = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["paths"]["/generateQuestions"]["post"].is_object());
}

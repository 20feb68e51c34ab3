use crate::{
    dto::question_dto::{GenerateQuestionsPayload, GenerateQuestionsResponse},
    error::Result,
    models::profile::Profile,
    AppState,
};
use axum::{extract::State, response::IntoResponse, Json};
use tracing::Instrument;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/generateQuestions",
    request_body = GenerateQuestionsPayload,
    responses(
        (status = 200, description = "Fifteen quiz questions for the profile", body = GenerateQuestionsResponse),
        (status = 400, description = "Invalid profile payload"),
    ),
)]
#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let profile: Profile = payload.into();
    let span = tracing::info_span!(
        "generate_questions",
        request_id = %uuid::Uuid::new_v4(),
        user_id = %profile.user_id,
    );
    let questions = state
        .question_service
        .generate_questions(&profile)
        .instrument(span)
        .await;

    Ok(Json(GenerateQuestionsResponse { questions }))
}

use crate::dto::question_dto::{GenerateQuestionsPayload, GenerateQuestionsResponse};
use crate::models::question::Question;
use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::routes::questions::generate_questions),
    components(schemas(GenerateQuestionsPayload, GenerateQuestionsResponse, Question))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

use crate::models::profile::Profile;
use crate::models::question::Question;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsPayload {
    #[validate(length(min = 1, message = "userId must not be empty"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "basename must not be empty"))]
    pub basename: String,
    pub bio: String,
    pub posts: Vec<String>,
}

impl From<GenerateQuestionsPayload> for Profile {
    fn from(p: GenerateQuestionsPayload) -> Self {
        Profile {
            user_id: p.user_id,
            basename: p.basename,
            bio: p.bio,
            posts: p.posts,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<Question>,
}

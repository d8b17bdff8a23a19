use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateQuizPayload {
    #[validate(length(min = 1, message = "url is required"))]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

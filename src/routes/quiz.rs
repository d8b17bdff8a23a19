use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::quiz_dto::{GenerateQuizPayload, QuizListQuery},
    error::{Error, Result},
    AppState,
};

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.generation_service.generate(&payload.url).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

#[axum::debug_handler]
pub async fn list_quizzes(
    State(state): State<AppState>,
    Query(query): Query<QuizListQuery>,
) -> Result<impl IntoResponse> {
    let quizzes = state.quiz_service.get_quizzes(query.limit, query.offset).await?;
    Ok(Json(quizzes))
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let quiz = state
        .quiz_service
        .get_quiz(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Quiz with ID {} not found", id)))?;
    Ok(Json(quiz))
}

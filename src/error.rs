use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Synthesis format error: {0}")]
    SynthesisFormat(String),

    #[error("Synthesis schema error: {0}")]
    SynthesisSchema(String),

    #[error("Completion service error: {0}")]
    Completion(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            Error::Validation { message, field } => (
                StatusCode::BAD_REQUEST,
                json!({ "message": message, "field": field }),
            ),
            Error::Fetch(msg) | Error::Extraction(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "message": msg }))
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            Error::SynthesisFormat(msg) | Error::SynthesisSchema(msg) | Error::Completion(msg) => {
                tracing::error!(message = %msg, "quiz generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Failed to generate quiz" }),
                )
            }
            Error::Database(err) => {
                tracing::error!(error = ?err, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
            Error::Config(msg) | Error::Internal(msg) => {
                tracing::error!(message = %msg, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err.field_errors().keys().next().map(|k| k.to_string());
        Error::Validation {
            message: err.to_string(),
            field,
        }
    }
}

//! Application-wide error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("server startup error: {0}")]
    ServerStartup(String),

    #[error("failed to load templates from {dir}")]
    TemplateInit {
        dir: String,
        #[source]
        source: tera::Error,
    },

    #[error("failed to render template {template}")]
    Template {
        template: String,
        #[source]
        source: tera::Error,
    },

    #[error("malformed visit count in session: {value}")]
    MalformedVisitCount {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("malformed last-visit timestamp in session: {value}")]
    MalformedTimestamp { value: String },

    #[error("category already exists: {name}")]
    DuplicateCategory { name: String },

    #[error("username already taken: {username}")]
    DuplicateUser { username: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::DuplicateCategory { .. } | AppError::DuplicateUser { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!("request failed: {self}");
        (status, self.to_string()).into_response()
    }
}

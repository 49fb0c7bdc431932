//! Handler errors and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::models::Message;

/// Every failure a handler can return; rendered as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User already exists")]
    UserExists,

    #[error("Todo not found")]
    TodoNotFound,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::InvalidCredentials | ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::UserExists => StatusCode::CONFLICT,
            ServerError::TodoNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(Message::new(self.to_string()))).into_response()
    }
}

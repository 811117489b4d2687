use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reanalyzer_core::ReanalyzeError;
use std::fmt;
use tracing::error;

use crate::api::ApiResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), error = %self.message, "request failed");
        }
        let body = Json(ApiResponse::<()>::error(self.message));
        (self.status, body).into_response()
    }
}

impl From<ReanalyzeError> for AppError {
    fn from(err: ReanalyzeError) -> Self {
        match err {
            ReanalyzeError::InvalidQuery(msg) => Self::bad_request(msg),
            ReanalyzeError::Upstream(_) => Self::bad_gateway(err.to_string()),
            ReanalyzeError::Store(_) => Self::internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::errors::AppError;
use crate::infra::app_state::AppState;

pub async fn shared_secret_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if !state.guard.check(presented) {
        warn!(path = request.uri().path(), "rejected unauthorized request");
        return AppError::unauthorized("Unauthorized").into_response();
    }

    next.run(request).await
}

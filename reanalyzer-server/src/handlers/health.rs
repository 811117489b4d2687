use axum::http::StatusCode;

pub async fn health_handler() -> &'static str {
    "OK"
}

pub async fn index_handler() -> StatusCode {
    StatusCode::OK
}

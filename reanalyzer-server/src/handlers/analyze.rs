use axum::{Json, body::Bytes, extract::State};
use reanalyzer_core::ReanalyzeError;
use reanalyzer_model::{AnalysisOutcome, LookupRequest};
use tracing::info;

use crate::api::ApiResponse;
use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

/// `POST /analyze_media` with `{title?, filename?, library_section?}`.
///
/// The body is parsed by hand so that a missing or empty body reports the
/// same 400 as a body without an identifying field.
pub async fn analyze_media_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<Vec<AnalysisOutcome>>>> {
    let request = parse_request(&body)?;

    let outcomes = state
        .dispatcher
        .analyze(&request, state.miss_policy)
        .await
        .map_err(|err| match err {
            ReanalyzeError::InvalidQuery(msg) => AppError::bad_request(msg),
            other => AppError::internal(format!("Error analyzing media: {other}")),
        })?;

    let analyzed = outcomes.iter().filter(|o| o.success()).count();
    info!(analyzed, total = outcomes.len(), "analyze request handled");

    let message = summary(&outcomes);
    Ok(Json(ApiResponse::success(outcomes).with_message(message)))
}

fn parse_request(body: &[u8]) -> Result<LookupRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::bad_request(
            "Missing title or filename in request body",
        ));
    }
    serde_json::from_slice(body).map_err(|err| {
        AppError::bad_request(format!("Invalid request body: {err}"))
    })
}

fn summary(outcomes: &[AnalysisOutcome]) -> String {
    outcomes
        .iter()
        .map(|outcome| outcome.detail.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

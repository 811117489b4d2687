use axum::{
    Json,
    extract::{Query, State},
};
use reanalyzer_model::ReconcileReport;
use serde::Deserialize;

use crate::api::ApiResponse;
use crate::errors::AppResult;
use crate::infra::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SectionParams {
    pub library_section: Option<String>,
}

impl SectionParams {
    fn section(&self) -> Option<&str> {
        self.library_section
            .as_deref()
            .filter(|section| !section.trim().is_empty())
    }
}

/// Full load of the configured (or requested) section into the cache.
pub async fn load_ratingkeys_handler(
    State(state): State<AppState>,
    Query(params): Query<SectionParams>,
) -> AppResult<Json<ApiResponse<ReconcileReport>>> {
    let report = state.reconciler().reconcile(params.section()).await?;
    Ok(Json(
        ApiResponse::success(report).with_message("Rating keys loaded from Plex!"),
    ))
}

pub async fn sync_db_handler(
    State(state): State<AppState>,
    Query(params): Query<SectionParams>,
) -> AppResult<Json<ApiResponse<ReconcileReport>>> {
    let report = state.reconciler().reconcile(params.section()).await?;
    Ok(Json(
        ApiResponse::success(report)
            .with_message("Database synchronized with Plex!"),
    ))
}

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::auth::middleware::shared_secret_middleware;
use crate::handlers::{analyze, health, library};
use crate::infra::app_state::AppState;

/// Builds the full router. `/health` sits outside the shared-secret guard.
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(health::index_handler))
        .route("/load_ratingkeys", post(library::load_ratingkeys_handler))
        .route("/sync_db", put(library::sync_db_handler))
        .route("/analyze_media", post(analyze::analyze_media_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            shared_secret_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

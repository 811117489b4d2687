use std::sync::Arc;

use anyhow::Context;
use reanalyzer_config::Config;
use reanalyzer_core::{JsonFileCacheStore, PlexCatalogClient};
use tokio::net::TcpListener;
use tracing::info;

use super::app_state::AppState;
use crate::auth::SharedSecretGuard;
use crate::routes::create_app;

/// Wires the Plex client, the JSON cache file and the auth guard from config.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let catalog = PlexCatalogClient::new(
        config.plex.server_url.as_str(),
        config.plex.token.clone(),
        config.plex.timeout,
    )
    .context("failed to build Plex client")?;

    let store = JsonFileCacheStore::open(&config.cache.db_path)
        .await
        .with_context(|| {
            format!(
                "failed to open cache file {}",
                config.cache.db_path.display()
            )
        })?;

    Ok(AppState::new(
        Arc::new(catalog),
        Arc::new(store),
        config.plex.library_section.clone(),
        config.resolver.miss_policy,
        SharedSecretGuard::new(config.auth.header_secret.clone()),
    ))
}

pub async fn serve(config: &Config, state: AppState) -> anyhow::Result<()> {
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        address = %listener.local_addr()?,
        section = %config.plex.library_section,
        miss_policy = %config.resolver.miss_policy,
        auth = state.guard.is_enabled(),
        "reanalyzer listening"
    );

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    info!("stopping web server");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

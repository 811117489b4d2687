//! HTTP and command-line surfaces over `reanalyzer-core`.

pub mod api;
pub mod auth;
pub mod cli;
pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;

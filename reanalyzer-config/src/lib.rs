//! Configuration for the reanalyzer.
//!
//! Values come from a TOML file, then `.env`/process environment, then
//! command-line overrides, each layer replacing the one before it. The
//! result is validated once into a [`Config`]; soft problems surface as
//! [`ConfigWarnings`] instead of errors.

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{
    CliOverrides, ConfigLoad, ConfigLoader, ConfigLoaderOptions,
    error::ConfigLoadError,
};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    AuthConfig, CacheConfig, Config, ConfigMetadata, PlexConfig,
    ResolverConfig, ServerConfig,
};
pub use validation::{ConfigWarning, ConfigWarnings};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error(
        "missing required configuration value `{key}` (set `{env}` or add it to the config file)"
    )]
    MissingRequired {
        key: &'static str,
        env: &'static str,
    },
    #[error("invalid Plex server URL '{url}'")]
    InvalidPlexUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Plex server URL '{url}' must use http or https")]
    UnsupportedScheme { url: String },
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

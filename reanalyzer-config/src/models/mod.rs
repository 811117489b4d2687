pub mod sources;

use std::{fmt, path::PathBuf, time::Duration};

use reanalyzer_model::MissPolicy;
use url::Url;

use crate::util::redact;

#[derive(Debug, Clone)]
pub struct Config {
    pub plex: PlexConfig,
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub resolver: ResolverConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Clone)]
pub struct PlexConfig {
    pub server_url: Url,
    pub token: String,
    pub library_section: String,
    pub timeout: Duration,
}

impl fmt::Debug for PlexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlexConfig")
            .field("server_url", &self.server_url.as_str())
            .field("token", &redact(&self.token))
            .field("library_section", &self.library_section)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` as accepted by `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub db_path: PathBuf,
}

#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected value of the `Authorization` header. `None` leaves the HTTP
    /// surface open.
    pub header_secret: Option<String>,
}

impl AuthConfig {
    pub fn is_enabled(&self) -> bool {
        self.header_secret.is_some()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "header_secret",
                &self.header_secret.as_deref().map(redact),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverConfig {
    pub miss_policy: MissPolicy,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

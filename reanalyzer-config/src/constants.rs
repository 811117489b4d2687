use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "plex-media.db.json";
pub const DEFAULT_PLEX_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_PLEX_SERVER_URL: &str = "PLEX_SERVER_URL";
pub const ENV_PLEX_TOKEN: &str = "PLEX_TOKEN";
pub const ENV_LIBRARY_SECTION_NAME: &str = "LIBRARY_SECTION_NAME";
pub const ENV_AUTH_HEADER: &str = "AUTH_HEADER";
pub const ENV_WEBSERVER_HOST: &str = "WEBSERVER_HOST";
pub const ENV_WEBSERVER_PORT: &str = "WEBSERVER_PORT";
pub const ENV_DB_PATH: &str = "DB_PATH";
pub const ENV_PLEX_TIMEOUT_SECS: &str = "PLEX_TIMEOUT_SECS";
pub const ENV_MISS_POLICY: &str = "MISS_POLICY";

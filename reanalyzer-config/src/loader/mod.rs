pub mod error;

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use reanalyzer_model::MissPolicy;
use tracing::debug;
use url::Url;

use crate::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_DB_PATH, DEFAULT_HOST, DEFAULT_PLEX_TIMEOUT,
    DEFAULT_PORT, ENV_LIBRARY_SECTION_NAME, ENV_PLEX_SERVER_URL,
    ENV_PLEX_TOKEN,
};
use crate::models::{
    AuthConfig, CacheConfig, Config, ConfigMetadata, PlexConfig,
    ResolverConfig, ServerConfig,
    sources::{EnvConfig, FileConfig},
};
use crate::util::non_empty;
use crate::validation::{self, ConfigWarnings};
use error::ConfigLoadError;

/// Values given on the command line; they win over every other layer.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub library_section: Option<String>,
    pub db_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub miss_policy: Option<MissPolicy>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    /// Config file to read. Defaults to `config.toml` in the working
    /// directory.
    pub config_path: Option<PathBuf>,
    /// `.env` file to load. Defaults to dotenvy's upward search.
    pub env_file: Option<PathBuf>,
    pub overrides: CliOverrides,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        self.options.overrides = overrides;
        self
    }

    /// Loads `.env` into the process environment, then composes the config
    /// from file, environment and overrides.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env = EnvConfig::gather()?;
        self.load_with_env(env, env_file_loaded)
    }

    /// Composes the config from an already gathered environment layer.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();
        let config_path = self
            .options
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let file = match read_file_config(&config_path)? {
            Some(file) => {
                debug!(path = %config_path.display(), "loaded config file");
                Some(file)
            }
            None => {
                warnings.push_with_hint(
                    format!(
                        "Config file {} not found; loading from environment variables",
                        config_path.display()
                    ),
                    "Pass --config or create config.toml to keep settings on disk",
                );
                None
            }
        };
        let metadata = ConfigMetadata {
            config_path: file.as_ref().map(|_| config_path.clone()),
            env_file_loaded,
        };

        let config = compose(
            file.unwrap_or_default(),
            env,
            &self.options.overrides,
            metadata,
        )?;
        warnings.extend(validation::apply_guard_rails(&config));

        Ok(ConfigLoad { config, warnings })
    }
}

fn read_file_config(path: &Path) -> Result<Option<FileConfig>, ConfigLoadError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigLoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn compose(
    file: FileConfig,
    env: EnvConfig,
    overrides: &CliOverrides,
    metadata: ConfigMetadata,
) -> Result<Config, ConfigLoadError> {
    let FileConfig {
        plex: file_plex,
        server: file_server,
        cache: file_cache,
        auth: file_auth,
        resolver: file_resolver,
    } = file;

    let raw_url = required(
        env.plex_server_url.or(file_plex.server_url),
        "plex.server_url",
        ENV_PLEX_SERVER_URL,
    )?;
    let token = required(
        env.plex_token.or(file_plex.token),
        "plex.token",
        ENV_PLEX_TOKEN,
    )?;
    let library_section = required(
        overrides
            .library_section
            .clone()
            .or(env.library_section_name)
            .or(file_plex.library_section_name),
        "plex.library_section_name",
        ENV_LIBRARY_SECTION_NAME,
    )?;

    let plex = PlexConfig {
        server_url: parse_plex_url(&raw_url)?,
        token,
        library_section,
        timeout: env
            .plex_timeout_secs
            .or(file_plex.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PLEX_TIMEOUT),
    };

    let server = ServerConfig {
        host: overrides
            .host
            .clone()
            .or(env.webserver_host)
            .or(file_server.host.and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: overrides
            .port
            .or(env.webserver_port)
            .or(file_server.port)
            .unwrap_or(DEFAULT_PORT),
    };

    let cache = CacheConfig {
        db_path: overrides
            .db_path
            .clone()
            .or(env.db_path)
            .or(file_cache.db_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
    };

    let auth = AuthConfig {
        header_secret: env.auth_header.or(file_auth.header.and_then(non_empty)),
    };

    let resolver = ResolverConfig {
        miss_policy: overrides
            .miss_policy
            .or(env.miss_policy)
            .or(file_resolver.miss_policy)
            .unwrap_or_default(),
    };

    Ok(Config {
        plex,
        server,
        cache,
        auth,
        resolver,
        metadata,
    })
}

fn required(
    value: Option<String>,
    key: &'static str,
    env: &'static str,
) -> Result<String, ConfigLoadError> {
    value
        .and_then(non_empty)
        .ok_or(ConfigLoadError::MissingRequired { key, env })
}

fn parse_plex_url(raw: &str) -> Result<Url, ConfigLoadError> {
    let url = Url::parse(raw).map_err(|source| ConfigLoadError::InvalidPlexUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigLoadError::UnsupportedScheme {
            url: raw.to_string(),
        }),
    }
}

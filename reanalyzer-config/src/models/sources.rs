use reanalyzer_model::MissPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    ENV_AUTH_HEADER, ENV_DB_PATH, ENV_LIBRARY_SECTION_NAME, ENV_MISS_POLICY,
    ENV_PLEX_SERVER_URL, ENV_PLEX_TIMEOUT_SECS, ENV_PLEX_TOKEN,
    ENV_WEBSERVER_HOST, ENV_WEBSERVER_PORT,
};
use crate::loader::error::ConfigLoadError;
use crate::util::{non_empty, process_env};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub plex: FilePlexConfig,
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub cache: FileCacheConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub resolver: FileResolverConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilePlexConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_section_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileResolverConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miss_policy: Option<MissPolicy>,
}

/// Environment-derived configuration values. Blank variables count as unset.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub plex_server_url: Option<String>,
    pub plex_token: Option<String>,
    pub library_section_name: Option<String>,
    pub plex_timeout_secs: Option<u64>,
    pub auth_header: Option<String>,
    pub webserver_host: Option<String>,
    pub webserver_port: Option<u16>,
    pub db_path: Option<PathBuf>,
    pub miss_policy: Option<MissPolicy>,
}

impl EnvConfig {
    pub fn gather() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(process_env)
    }

    /// Builds the environment layer from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).and_then(non_empty);

        Ok(Self {
            plex_server_url: var(ENV_PLEX_SERVER_URL),
            plex_token: var(ENV_PLEX_TOKEN),
            library_section_name: var(ENV_LIBRARY_SECTION_NAME),
            plex_timeout_secs: parse_var(
                ENV_PLEX_TIMEOUT_SECS,
                var(ENV_PLEX_TIMEOUT_SECS),
            )?,
            auth_header: var(ENV_AUTH_HEADER),
            webserver_host: var(ENV_WEBSERVER_HOST),
            webserver_port: parse_var(
                ENV_WEBSERVER_PORT,
                var(ENV_WEBSERVER_PORT),
            )?,
            db_path: var(ENV_DB_PATH).map(PathBuf::from),
            miss_policy: parse_var(ENV_MISS_POLICY, var(ENV_MISS_POLICY))?,
        })
    }
}

fn parse_var<T>(
    key: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigLoadError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| {
        value
            .parse()
            .map_err(|err: T::Err| ConfigLoadError::InvalidValue {
                key,
                reason: format!("'{value}': {err}"),
            })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn blank_variables_are_ignored() {
        let env = EnvConfig::from_lookup(lookup(&[
            ("PLEX_TOKEN", "   "),
            ("LIBRARY_SECTION_NAME", "Movies"),
        ]))
        .unwrap();
        assert_eq!(env.plex_token, None);
        assert_eq!(env.library_section_name.as_deref(), Some("Movies"));
    }

    #[test]
    fn typed_variables_are_parsed() {
        let env = EnvConfig::from_lookup(lookup(&[
            ("WEBSERVER_PORT", "9090"),
            ("PLEX_TIMEOUT_SECS", "5"),
            ("MISS_POLICY", "full_sync"),
        ]))
        .unwrap();
        assert_eq!(env.webserver_port, Some(9090));
        assert_eq!(env.plex_timeout_secs, Some(5));
        assert_eq!(env.miss_policy, Some(MissPolicy::FullSync));
    }

    #[test]
    fn malformed_port_is_rejected() {
        let err = EnvConfig::from_lookup(lookup(&[("WEBSERVER_PORT", "http")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::InvalidValue {
                key: "WEBSERVER_PORT",
                ..
            }
        ));
    }

    #[test]
    fn file_config_parses_sectioned_toml() {
        let file: FileConfig = toml::from_str(
            r#"
            [plex]
            server_url = "http://plex.lan:32400"
            token = "abc"
            library_section_name = "Movies"

            [resolver]
            miss_policy = "full_sync"
            "#,
        )
        .unwrap();
        assert_eq!(file.plex.token.as_deref(), Some("abc"));
        assert_eq!(file.resolver.miss_policy, Some(MissPolicy::FullSync));
        assert!(file.server.port.is_none());
    }
}

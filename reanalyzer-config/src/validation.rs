use std::fmt;

use super::models::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} (hint: {hint})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Soft checks on a fully composed config. Nothing here is fatal.
pub fn apply_guard_rails(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if !config.auth.is_enabled() {
        warnings.push_with_hint(
            "AUTH_HEADER not set; the HTTP endpoints accept unauthenticated requests",
            "Set AUTH_HEADER (or [auth] header) to require a shared secret in the Authorization header",
        );
    }

    if config.plex.server_url.scheme() == "http"
        && !is_loopback(config.plex.server_url.host_str())
    {
        warnings.push_with_hint(
            "Plex server URL uses plain http; the Plex token is sent unencrypted",
            "Use the https URL of the Plex server when it is not on localhost",
        );
    }

    if config.plex.timeout.is_zero() {
        warnings.push(
            "PLEX_TIMEOUT_SECS is 0; requests to Plex will fail immediately",
        );
    }

    warnings
}

fn is_loopback(host: Option<&str>) -> bool {
    let Some(host) = host else {
        return false;
    };
    let normalized = host.trim().trim_end_matches('.').to_ascii_lowercase();
    normalized == "localhost"
        || normalized == "[::1]"
        || normalized == "::1"
        || normalized.starts_with("127.")
}

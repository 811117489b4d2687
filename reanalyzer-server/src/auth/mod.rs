//! Shared-secret guard for the HTTP surface.

pub mod middleware;

use constant_time_eq::constant_time_eq;
use std::fmt;

/// Compares the `Authorization` header against a configured secret. With no
/// secret configured every request is let through.
#[derive(Clone, Default)]
pub struct SharedSecretGuard {
    secret: Option<String>,
}

impl fmt::Debug for SharedSecretGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecretGuard")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl SharedSecretGuard {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub fn check(&self, presented: Option<&str>) -> bool {
        match (&self.secret, presented) {
            (None, _) => true,
            (Some(expected), Some(presented)) => {
                constant_time_eq(expected.as_bytes(), presented.as_bytes())
            }
            (Some(_), None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_guard_allows_everything() {
        let guard = SharedSecretGuard::new(None);
        assert!(guard.check(None));
        assert!(guard.check(Some("anything")));

        assert!(!SharedSecretGuard::new(Some(String::new())).is_enabled());
    }

    #[test]
    fn enabled_guard_requires_exact_value() {
        let guard = SharedSecretGuard::new(Some("s3cret".into()));
        assert!(guard.check(Some("s3cret")));
        assert!(!guard.check(Some("s3cret ")));
        assert!(!guard.check(Some("Bearer s3cret")));
        assert!(!guard.check(None));
    }
}

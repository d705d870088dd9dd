use crate::error::{Px6Error, Px6Result};
use secrecy::{ExposeSecret, SecretString};

/// Environment variable consulted when no API key is given to the builder.
pub const API_KEY_ENV: &str = "PX6_API_KEY";

/// The static API key that px6.link expects as the first path segment.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Wrap a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Read the key from the `PX6_API_KEY` environment variable.
    pub fn from_env() -> Px6Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(Px6Error::MissingConfig(format!(
                "api key is required. Set it via builder or {API_KEY_ENV} env var."
            ))),
        }
    }

    /// The key as it goes into the URL path.
    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn debug_does_not_leak_key() {
        let key = ApiKey::new("d41d8cd98f-secret");
        let printed = format!("{key:?}");
        assert_eq!(printed, "ApiKey(****)");
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn expose_returns_raw_key() {
        let key = ApiKey::new("abc123");
        assert_eq!(key.expose(), "abc123");
    }

    #[test]
    #[serial]
    fn from_env_reads_variable() {
        let original = std::env::var(API_KEY_ENV).ok();
        std::env::set_var(API_KEY_ENV, "  env-key  ");

        let key = ApiKey::from_env().expect("should read key");
        assert_eq!(key.expose(), "env-key");

        match original {
            Some(val) => std::env::set_var(API_KEY_ENV, val),
            None => std::env::remove_var(API_KEY_ENV),
        }
    }

    #[test]
    #[serial]
    fn from_env_rejects_missing_or_blank() {
        let original = std::env::var(API_KEY_ENV).ok();

        std::env::remove_var(API_KEY_ENV);
        assert!(matches!(ApiKey::from_env(), Err(Px6Error::MissingConfig(_))));

        std::env::set_var(API_KEY_ENV, "   ");
        assert!(matches!(ApiKey::from_env(), Err(Px6Error::MissingConfig(_))));

        match original {
            Some(val) => std::env::set_var(API_KEY_ENV, val),
            None => std::env::remove_var(API_KEY_ENV),
        }
    }
}

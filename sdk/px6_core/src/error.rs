use thiserror::Error;

/// Errors that can occur when interacting with the px6.link API.
#[derive(Error, Debug)]
pub enum Px6Error {
    /// The provider answered with a failure envelope (`"status": "no"`).
    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    /// The server answered with a non-success status and a body that is not JSON.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The response body could not be parsed, or a field could not be coerced.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The base URL is invalid.
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// A request builder was given incomplete or invalid input.
    #[error("Invalid request: {0}")]
    Builder(String),
}

impl Px6Error {
    /// Create a provider error from the failure envelope fields.
    pub fn provider(code: i64, message: impl Into<String>) -> Self {
        Self::Provider {
            code,
            message: message.into(),
        }
    }

    /// Create an HTTP error for a non-success status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// The provider's error code, if this is a provider failure.
    pub fn provider_code(&self) -> Option<i64> {
        match self {
            Self::Provider { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias for px6 operations.
pub type Px6Result<T> = std::result::Result<T, Px6Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_includes_code_and_message() {
        let err = Px6Error::provider(200, "Error key");
        assert_eq!(err.to_string(), "Provider error 200: Error key");
    }

    #[test]
    fn provider_code_only_for_provider_errors() {
        assert_eq!(Px6Error::provider(30, "Error unknown").provider_code(), Some(30));
        assert_eq!(Px6Error::http(502, "Bad Gateway").provider_code(), None);
        assert_eq!(Px6Error::Builder("x".into()).provider_code(), None);
    }

    #[test]
    fn serialization_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Px6Error = json_err.into();
        assert!(matches!(err, Px6Error::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error"));
    }
}

//! HTTP client for the px6.link API.
//!
//! This module provides [`Px6Client`], the request dispatcher every operation
//! goes through. It builds `<base_url>/<api_key>/<method>` URLs, issues a single
//! GET per call, decodes the JSON body and turns the provider's failure envelope
//! into [`Px6Error::Provider`].
//!
//! # Examples
//!
//! ## Using an explicit key
//! ```rust,no_run
//! use px6_core::client::Px6Client;
//! use px6_core::models::{ApiMethod, QueryParams};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Px6Client::builder().api_key("your-key").build()?;
//! let raw = client.execute(ApiMethod::GetBalance, &QueryParams::new()).await?;
//! println!("balance: {}", raw["balance"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sharing an existing HTTP client
//! ```rust,no_run
//! use px6_core::client::Px6Client;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let http = reqwest::Client::new();
//! let client = Px6Client::builder()
//!     .api_key("your-key")
//!     .http_client(http.clone())
//!     .build()?;
//! assert!(!client.owns_http_client());
//! # Ok(())
//! # }
//! ```

use crate::auth::ApiKey;
use crate::error::{Px6Error, Px6Result};
use crate::models::{ApiMethod, QueryParams};
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;
use url::Url;

/// Default base address of the px6.link API.
pub const DEFAULT_BASE_URL: &str = "https://px6.link/api";

/// Environment variable consulted when no base URL is given to the builder.
pub const BASE_URL_ENV: &str = "PX6_BASE_URL";

/// Value of the `status` field that marks a failure envelope.
pub const FAILURE_STATUS: &str = "no";

/// Message used when a failure envelope carries no `error` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// The client for the px6.link API.
///
/// Cloning is cheap; clones share the underlying HTTP client. When no HTTP
/// client is supplied, one is created on the first request and dropped together
/// with the last clone of this client, whichever way the surrounding scope is
/// left. A supplied HTTP client is only held as a handle and stays usable by its
/// owner.
#[derive(Debug, Clone)]
pub struct Px6Client {
    http: Arc<OnceCell<HttpClient>>,
    base_url: Url,
    api_key: ApiKey,
    owns_http: bool,
}

/// Builder for constructing a [`Px6Client`].
///
/// Use [`Px6Client::builder()`] to create a new builder.
#[derive(Debug, Default)]
pub struct Px6ClientBuilder {
    base_url: Option<String>,
    api_key: Option<ApiKey>,
    http_client: Option<HttpClient>,
}

impl Px6Client {
    /// Create a new builder for configuring a `Px6Client`.
    pub fn builder() -> Px6ClientBuilder {
        Px6ClientBuilder::default()
    }

    /// Create a client for `api_key` with every other setting at its default.
    pub fn new(api_key: impl Into<String>) -> Px6Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Get the base URL (without the key and method segments).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether this client created, and therefore owns, its HTTP client.
    pub fn owns_http_client(&self) -> bool {
        self.owns_http
    }

    /// Whether the HTTP client exists yet. Owned clients are created lazily.
    pub fn http_client_initialized(&self) -> bool {
        self.http.initialized()
    }

    /// Build the full URL for an API method.
    pub(crate) fn method_url(&self, method: ApiMethod) -> Px6Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Px6Error::InvalidEndpoint("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .push(self.api_key.expose())
            .push(method.as_str());
        Ok(url)
    }

    async fn http_client(&self) -> Px6Result<&HttpClient> {
        self.http
            .get_or_try_init(|| async {
                tracing::debug!("creating owned HTTP client");
                HttpClient::builder()
                    .build()
                    .map_err(|e| Px6Error::Request(e.without_url()))
            })
            .await
    }

    /// Call an API method and return the decoded success envelope.
    ///
    /// # Arguments
    ///
    /// * `method` - The API method, used as the last path segment.
    /// * `params` - Query-string parameters for the call.
    ///
    /// # Errors
    ///
    /// Returns [`Px6Error::Provider`] when the envelope's `status` is `"no"`,
    /// [`Px6Error::Request`] on transport failure, [`Px6Error::Serialization`]
    /// when the body is not JSON, and [`Px6Error::Http`] when a non-success
    /// status comes with a body that is not JSON.
    ///
    /// # Tracing
    ///
    /// Emits a span named `px6::execute` with field `method`. The API key and
    /// the request URL are never recorded.
    #[tracing::instrument(name = "px6::execute", skip(self, params), fields(method = %method))]
    pub async fn execute(&self, method: ApiMethod, params: &QueryParams) -> Px6Result<Value> {
        let url = self.method_url(method)?;
        let http = self.http_client().await?;

        tracing::debug!(params = ?params.keys().collect::<Vec<_>>(), "dispatching request");

        let response = http
            .get(url)
            .query(params.as_pairs())
            .send()
            .await
            .map_err(|e| Px6Error::Request(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Px6Error::Request(e.without_url()))?;

        let data: Value = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                return Err(Px6Error::http(
                    status.as_u16(),
                    self.truncate_message(&body),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        Self::check_envelope(data)
    }

    /// Maximum length for error messages built from response bodies.
    const MAX_ERROR_MESSAGE_LEN: usize = 1000;

    /// Replace any occurrence of the API key with a placeholder.
    pub(crate) fn sanitize_error_message(&self, msg: &str) -> String {
        let key = self.api_key.expose();
        if key.is_empty() {
            msg.to_string()
        } else {
            msg.replace(key, "[REDACTED]")
        }
    }

    /// Sanitize, then truncate a message on a character boundary.
    pub(crate) fn truncate_message(&self, msg: &str) -> String {
        let sanitized = self.sanitize_error_message(msg);

        if sanitized.chars().count() > Self::MAX_ERROR_MESSAGE_LEN {
            let head: String = sanitized.chars().take(Self::MAX_ERROR_MESSAGE_LEN).collect();
            format!("{head}... (truncated)")
        } else {
            sanitized
        }
    }

    /// Fail with [`Px6Error::Provider`] if `data` is a failure envelope.
    pub(crate) fn check_envelope(data: Value) -> Px6Result<Value> {
        if data.get("status").and_then(Value::as_str) != Some(FAILURE_STATUS) {
            return Ok(data);
        }

        let code = data.get("error_id").map(error_code).unwrap_or(0);
        let message = match data.get("error") {
            None | Some(Value::Null) => UNKNOWN_ERROR_MESSAGE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        tracing::warn!(code, message = %message, "provider rejected request");
        Err(Px6Error::provider(code, message))
    }
}

/// Read `error_id`, which the provider sends either as a number or a numeric string.
fn error_code(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

impl Px6ClientBuilder {
    /// Set the API key.
    ///
    /// If not set, the builder reads the `PX6_API_KEY` environment variable.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey::new(key));
        self
    }

    /// Set the base URL.
    ///
    /// Defaults to the `PX6_BASE_URL` environment variable, then to
    /// [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use an existing HTTP client.
    ///
    /// The client is borrowed: [`Px6Client`] keeps a handle to it but never
    /// reports ownership of it, and the caller's handle stays valid after the
    /// `Px6Client` is dropped. Use this to configure timeouts or proxies.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the `Px6Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is provided and `PX6_API_KEY` is not set
    /// - The base URL is invalid or not `http`/`https`
    pub fn build(self) -> Px6Result<Px6Client> {
        let base_str = self
            .base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let base_url = Url::parse(&base_str)
            .map_err(|e| Px6Error::InvalidEndpoint(format!("{base_str}: {e}")))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Px6Error::InvalidEndpoint(format!(
                "{base_str}: expected an http or https URL"
            )));
        }

        let api_key = match self.api_key {
            Some(key) if key.expose().trim().is_empty() => {
                return Err(Px6Error::MissingConfig("api key cannot be empty".into()));
            }
            Some(key) => key,
            None => ApiKey::from_env()?,
        };

        let (http, owns_http) = match self.http_client {
            Some(client) => (OnceCell::from(client), false),
            None => (OnceCell::new(), true),
        };

        Ok(Px6Client {
            http: Arc::new(http),
            base_url,
            api_key,
            owns_http,
        })
    }
}

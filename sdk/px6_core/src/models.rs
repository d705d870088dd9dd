//! Wire-level types shared by all px6 crates.
//!
//! [`ApiMethod`] enumerates the fixed method names that form the last path
//! segment of every request, and [`QueryParams`] encodes operation parameters
//! the way the provider expects them.

use std::fmt;

/// A px6.link API method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    /// Price quote for an order.
    GetPrice,
    /// Number of proxies available in a country.
    GetCountry,
    /// Countries available for a proxy version.
    GetCountries,
    /// List of leased proxies.
    GetProxy,
    /// Change the protocol type of proxies.
    SetType,
    /// Change the description of proxies.
    SetDescr,
    /// Purchase proxies.
    Buy,
    /// Renew proxies.
    Prolong,
    /// Delete proxies.
    Delete,
    /// Check that a proxy is reachable.
    Check,
    /// Set or clear IP authorization.
    IpAuth,
    /// Account balance.
    GetBalance,
}

impl ApiMethod {
    /// Returns the method name used in the request path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetPrice => "getprice",
            Self::GetCountry => "getcountry",
            Self::GetCountries => "getcountries",
            Self::GetProxy => "getproxy",
            Self::SetType => "settype",
            Self::SetDescr => "setdescr",
            Self::Buy => "buy",
            Self::Prolong => "prolong",
            Self::Delete => "delete",
            Self::Check => "check",
            Self::IpAuth => "ipauth",
            Self::GetBalance => "getbalance",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join proxy ids into the comma-separated form the provider accepts.
///
/// ```rust
/// use px6_core::models::join_ids;
///
/// assert_eq!(join_ids(&[101, 202, 303]), "101,202,303");
/// ```
pub fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Ordered query-string parameters for a single API call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter unconditionally.
    pub fn push(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Adds a string parameter only when it is present and non-empty.
    pub fn push_non_empty(&mut self, key: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Adds a boolean flag as the literal `1` when set. Unset flags are omitted,
    /// never sent as `0`.
    pub fn flag(&mut self, key: &'static str, enabled: bool) -> &mut Self {
        if enabled {
            self.pairs.push((key, "1".to_string()));
        }
        self
    }

    /// Adds a comma-joined id list.
    pub fn push_ids(&mut self, key: &'static str, ids: &[u64]) -> &mut Self {
        self.pairs.push((key, join_ids(ids)));
        self
    }

    /// Returns the value recorded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if `key` was added.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Parameter names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pairs.iter().map(|(k, _)| *k)
    }

    /// Returns `true` if no parameter was added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

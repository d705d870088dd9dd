//! Shared types for the px6.link operations.
//!
//! This module contains the request enumerations and the records returned by
//! more than one endpoint family.

use px6_core::error::{Px6Error, Px6Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::de;

// ---------------------------------------------------------------------------
// Request enumerations
// ---------------------------------------------------------------------------

/// The IP version of a proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProxyVersion {
    /// Shared IPv4 (`"3"`).
    Ipv4Shared,
    /// Dedicated IPv4 (`"4"`).
    Ipv4,
    /// IPv6 (`"6"`).
    #[default]
    Ipv6,
}

impl ProxyVersion {
    /// Returns the API string representation of this version.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ipv4Shared => "3",
            Self::Ipv4 => "4",
            Self::Ipv6 => "6",
        }
    }
}

/// The protocol a proxy speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProxyType {
    /// HTTP(S) proxy.
    #[default]
    Http,
    /// SOCKS5 proxy.
    Socks,
}

impl ProxyType {
    /// Returns the API string representation of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Socks => "socks",
        }
    }
}

/// A filter on the lease state of proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProxyState {
    /// Proxies with a running lease.
    Active,
    /// Proxies whose lease has ended.
    Expired,
    /// Proxies whose lease ends soon.
    Expiring,
    /// Every proxy on the account.
    #[default]
    All,
}

impl ProxyState {
    /// Returns the API string representation of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Expiring => "expiring",
            Self::All => "all",
        }
    }
}

macro_rules! wire_enum_traits {
    ($ty:ty, $what:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Px6Error;

            fn from_str(s: &str) -> Px6Result<Self> {
                [$($variant),+]
                    .into_iter()
                    .find(|v: &$ty| v.as_str() == s)
                    .ok_or_else(|| Px6Error::Builder(format!("unknown {} '{}'", $what, s)))
            }
        }
    };
}

wire_enum_traits!(
    ProxyVersion,
    "proxy version",
    [ProxyVersion::Ipv4Shared, ProxyVersion::Ipv4, ProxyVersion::Ipv6]
);
wire_enum_traits!(ProxyType, "proxy type", [ProxyType::Http, ProxyType::Socks]);
wire_enum_traits!(
    ProxyState,
    "proxy state",
    [
        ProxyState::Active,
        ProxyState::Expired,
        ProxyState::Expiring,
        ProxyState::All
    ]
);

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A status-only acknowledgement carrying the account summary.
///
/// Returned by the balance query and by the type, description and IP
/// authorization updates.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GenericAck {
    /// Envelope status, `"yes"` on success.
    #[serde(default, deserialize_with = "de::string")]
    pub status: String,

    /// Account id.
    #[serde(default, deserialize_with = "de::integer")]
    pub user_id: u64,

    /// Account balance.
    #[serde(default, deserialize_with = "de::float")]
    pub balance: f64,

    /// Balance currency (e.g. `"RUB"`).
    #[serde(default, deserialize_with = "de::string")]
    pub currency: String,
}

/// One leased proxy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProxyRecord {
    /// Proxy id.
    #[serde(default, deserialize_with = "de::integer")]
    pub id: u64,

    /// Outgoing IP address.
    #[serde(default, deserialize_with = "de::string")]
    pub ip: String,

    /// Host to connect to.
    #[serde(default, deserialize_with = "de::string")]
    pub host: String,

    /// Port to connect to, as sent by the provider.
    #[serde(default, deserialize_with = "de::string")]
    pub port: String,

    /// Login. Empty when credentials were suppressed with `nokey`.
    #[serde(default, deserialize_with = "de::string")]
    pub user: String,

    /// Password. Empty when credentials were suppressed with `nokey`.
    #[serde(rename = "pass", default, deserialize_with = "de::string")]
    pub password: String,

    /// Protocol type (`"http"` or `"socks"`).
    #[serde(rename = "type", default, deserialize_with = "de::string")]
    pub proxy_type: String,

    /// Country code.
    #[serde(default, deserialize_with = "de::string")]
    pub country: String,

    /// Lease start, formatted by the provider.
    #[serde(default, deserialize_with = "de::string")]
    pub date: String,

    /// Lease end, formatted by the provider.
    #[serde(default, deserialize_with = "de::string")]
    pub date_end: String,

    /// Lease start as a Unix timestamp.
    #[serde(default, deserialize_with = "de::integer")]
    pub unixtime: u64,

    /// Lease end as a Unix timestamp.
    #[serde(default, deserialize_with = "de::integer")]
    pub unixtime_end: u64,

    /// Free-form description.
    #[serde(rename = "descr", default, deserialize_with = "de::string")]
    pub description: String,

    /// Whether the lease is running. Only the string `"1"` counts as active.
    #[serde(default, deserialize_with = "de::flag_one")]
    pub active: bool,
}

impl ProxyRecord {
    /// `host:port` for connecting to the proxy.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the provider reports this proxy as SOCKS.
    pub fn is_socks(&self) -> bool {
        self.proxy_type == ProxyType::Socks.as_str()
    }
}

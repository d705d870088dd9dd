//! Account-level operations: balance and IP authorization.
//!
//! ## Example
//!
//! ```rust,no_run
//! use px6_core::client::Px6Client;
//! use px6_proxies::account;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Px6Client::new("your-key")?;
//!
//! let summary = account::balance(&client).await?;
//! println!("{} {}", summary.balance, summary.currency);
//!
//! // Allow password-less use from two addresses, then revoke it
//! account::set_ip_auth(&client, ["203.0.113.7", "198.51.100.4"]).await?;
//! account::clear_ip_auth(&client).await?;
//! # Ok(())
//! # }
//! ```

use px6_core::client::Px6Client;
use px6_core::error::Px6Result;
use px6_core::models::{ApiMethod, QueryParams};

use crate::de;
use crate::models::GenericAck;

/// Value of the `ip` parameter that removes every authorized address.
pub const CLEAR_IP_AUTH: &str = "remove";

/// Fetch the account summary.
///
/// # Tracing
///
/// Emits a span named `px6::account::balance`.
#[tracing::instrument(name = "px6::account::balance", skip(client))]
pub async fn balance(client: &Px6Client) -> Px6Result<GenericAck> {
    tracing::debug!("requesting balance");

    let data = client
        .execute(ApiMethod::GetBalance, &QueryParams::new())
        .await?;
    let ack: GenericAck = de::decode(data)?;

    tracing::debug!(balance = ack.balance, currency = %ack.currency, "balance received");
    Ok(ack)
}

/// Authorize the given IP addresses to use the account's proxies without a
/// login.
///
/// The addresses are sent comma-joined, in iteration order.
///
/// # Tracing
///
/// Emits a span named `px6::account::set_ip_auth` with field `addresses`.
#[tracing::instrument(
    name = "px6::account::set_ip_auth",
    skip(client, ips),
    fields(addresses = tracing::field::Empty)
)]
pub async fn set_ip_auth<I, S>(client: &Px6Client, ips: I) -> Px6Result<GenericAck>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = ips
        .into_iter()
        .map(|ip| ip.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",");
    tracing::Span::current().record("addresses", joined.as_str());
    tracing::debug!("setting IP authorization");

    send_ip_auth(client, joined).await
}

/// Remove every authorized IP address.
///
/// # Tracing
///
/// Emits a span named `px6::account::clear_ip_auth`.
#[tracing::instrument(name = "px6::account::clear_ip_auth", skip(client))]
pub async fn clear_ip_auth(client: &Px6Client) -> Px6Result<GenericAck> {
    tracing::debug!("clearing IP authorization");
    send_ip_auth(client, CLEAR_IP_AUTH.to_string()).await
}

async fn send_ip_auth(client: &Px6Client, ip: String) -> Px6Result<GenericAck> {
    let mut params = QueryParams::new();
    params.push("ip", ip);

    let data = client.execute(ApiMethod::IpAuth, &params).await?;
    de::decode(data)
}

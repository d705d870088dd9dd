//! Pricing and availability queries.
//!
//! These calls never change the account: they quote an order, report how many
//! proxies a country has in stock, and list the countries offered for a proxy
//! version.
//!
//! ## Example
//!
//! ```rust,no_run
//! use px6_core::client::Px6Client;
//! use px6_proxies::models::ProxyVersion;
//! use px6_proxies::pricing;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Px6Client::new("your-key")?;
//!
//! let catalog = pricing::countries(&client, ProxyVersion::Ipv4).await?;
//! for country in &catalog.countries {
//!     let stock = pricing::availability(&client, country, ProxyVersion::Ipv4).await?;
//!     println!("{country}: {} available", stock.count);
//! }
//!
//! let quote = pricing::quote(&client, 10, 30, ProxyVersion::Ipv4).await?;
//! println!("10 proxies for 30 days: {} {}", quote.price, quote.currency);
//! # Ok(())
//! # }
//! ```

use px6_core::client::Px6Client;
use px6_core::error::Px6Result;
use px6_core::models::{ApiMethod, QueryParams};
use serde::Deserialize;

use crate::de;
use crate::models::ProxyVersion;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A price quote for an order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct QuoteInfo {
    /// Envelope status.
    #[serde(default, deserialize_with = "de::string")]
    pub status: String,
    /// Account id.
    #[serde(default, deserialize_with = "de::integer")]
    pub user_id: u64,
    /// Account balance.
    #[serde(default, deserialize_with = "de::float")]
    pub balance: f64,
    /// Balance currency.
    #[serde(default, deserialize_with = "de::string")]
    pub currency: String,
    /// Total price of the order.
    #[serde(default, deserialize_with = "de::float")]
    pub price: f64,
    /// Price of one proxy for the period.
    #[serde(default, deserialize_with = "de::float")]
    pub price_single: f64,
    /// Lease period in days.
    #[serde(default, deserialize_with = "de::integer")]
    pub period: u32,
    /// Number of proxies quoted.
    #[serde(default, deserialize_with = "de::integer")]
    pub count: u64,
}

/// How many proxies can be bought in a country.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AvailabilityInfo {
    /// Envelope status.
    #[serde(default, deserialize_with = "de::string")]
    pub status: String,
    /// Account id.
    #[serde(default, deserialize_with = "de::integer")]
    pub user_id: u64,
    /// Account balance.
    #[serde(default, deserialize_with = "de::float")]
    pub balance: f64,
    /// Balance currency.
    #[serde(default, deserialize_with = "de::string")]
    pub currency: String,
    /// Proxies available for purchase.
    #[serde(default, deserialize_with = "de::integer")]
    pub count: u64,
}

/// Countries offered for a proxy version.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CountryCatalog {
    /// Envelope status.
    #[serde(default, deserialize_with = "de::string")]
    pub status: String,
    /// Account id.
    #[serde(default, deserialize_with = "de::integer")]
    pub user_id: u64,
    /// Account balance.
    #[serde(default, deserialize_with = "de::float")]
    pub balance: f64,
    /// Balance currency.
    #[serde(default, deserialize_with = "de::string")]
    pub currency: String,
    /// ISO country codes, in provider order.
    #[serde(rename = "list", default, deserialize_with = "de::keyed_or_list")]
    pub countries: Vec<String>,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Quote the price of `count` proxies leased for `period` days.
///
/// # Tracing
///
/// Emits a span named `px6::pricing::quote` with fields `count`, `period` and
/// `version`.
#[tracing::instrument(
    name = "px6::pricing::quote",
    skip(client),
    fields(version = %version)
)]
pub async fn quote(
    client: &Px6Client,
    count: u32,
    period: u32,
    version: ProxyVersion,
) -> Px6Result<QuoteInfo> {
    tracing::debug!("requesting price quote");

    let mut params = QueryParams::new();
    params
        .push("count", count)
        .push("period", period)
        .push("version", version.as_str());

    let data = client.execute(ApiMethod::GetPrice, &params).await?;
    let quote: QuoteInfo = de::decode(data)?;

    tracing::debug!(price = quote.price, "quote received");
    Ok(quote)
}

/// Report how many proxies of `version` are available in `country`.
///
/// # Tracing
///
/// Emits a span named `px6::pricing::availability` with fields `country` and
/// `version`.
#[tracing::instrument(
    name = "px6::pricing::availability",
    skip(client),
    fields(version = %version)
)]
pub async fn availability(
    client: &Px6Client,
    country: &str,
    version: ProxyVersion,
) -> Px6Result<AvailabilityInfo> {
    tracing::debug!("requesting availability");

    let mut params = QueryParams::new();
    params.push("country", country).push("version", version.as_str());

    let data = client.execute(ApiMethod::GetCountry, &params).await?;
    let info: AvailabilityInfo = de::decode(data)?;

    tracing::debug!(count = info.count, "availability received");
    Ok(info)
}

/// List the countries offered for `version`.
///
/// # Tracing
///
/// Emits a span named `px6::pricing::countries` with field `version`.
#[tracing::instrument(
    name = "px6::pricing::countries",
    skip(client),
    fields(version = %version)
)]
pub async fn countries(client: &Px6Client, version: ProxyVersion) -> Px6Result<CountryCatalog> {
    tracing::debug!("listing countries");

    let mut params = QueryParams::new();
    params.push("version", version.as_str());

    let data = client.execute(ApiMethod::GetCountries, &params).await?;
    let catalog: CountryCatalog = de::decode(data)?;

    tracing::debug!(countries = catalog.countries.len(), "countries received");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{account_envelope, setup_mock_client, TEST_API_KEY};
    use px6_core::error::Px6Error;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_quote_deserialization() {
        let json = serde_json::json!({
            "status": "yes",
            "user_id": "1",
            "balance": "48.80",
            "currency": "RUB",
            "price": 1800,
            "price_single": 0.6,
            "period": 30,
            "count": 100
        });

        let quote: QuoteInfo = serde_json::from_value(json).unwrap();

        assert_eq!(quote.status, "yes");
        assert_eq!(quote.user_id, 1);
        assert_eq!(quote.balance, 48.8);
        assert_eq!(quote.currency, "RUB");
        assert_eq!(quote.price, 1800.0);
        assert_eq!(quote.price_single, 0.6);
        assert_eq!(quote.period, 30);
        assert_eq!(quote.count, 100);
    }

    #[test]
    fn test_quote_rejects_non_numeric_price() {
        let json = serde_json::json!({"status": "yes", "price": "n/a"});
        assert!(serde_json::from_value::<QuoteInfo>(json).is_err());
    }

    #[test]
    fn test_country_catalog_minimal() {
        let catalog: CountryCatalog =
            serde_json::from_value(serde_json::json!({"status": "yes"})).unwrap();
        assert!(catalog.countries.is_empty());
        assert_eq!(catalog.user_id, 0);
    }

    #[tokio::test]
    async fn test_quote_success() {
        let server = MockServer::start().await;

        let mut body = account_envelope();
        body["price"] = serde_json::json!(1800);
        body["price_single"] = serde_json::json!(0.6);
        body["period"] = serde_json::json!(30);
        body["count"] = serde_json::json!(100);

        Mock::given(method("GET"))
            .and(path(format!("/{TEST_API_KEY}/getprice")))
            .and(query_param("count", "100"))
            .and(query_param("period", "30"))
            .and(query_param("version", "6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let quote = quote(&client, 100, 30, ProxyVersion::default())
            .await
            .expect("should succeed");

        assert_eq!(quote.price, 1800.0);
        assert_eq!(quote.count, 100);
        assert_eq!(quote.balance, 48.8);
    }

    #[tokio::test]
    async fn test_availability_success() {
        let server = MockServer::start().await;

        let mut body = account_envelope();
        body["count"] = serde_json::json!(971);

        Mock::given(method("GET"))
            .and(path(format!("/{TEST_API_KEY}/getcountry")))
            .and(query_param("country", "ru"))
            .and(query_param("version", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let info = availability(&client, "ru", ProxyVersion::Ipv4)
            .await
            .expect("should succeed");

        assert_eq!(info.count, 971);
        assert_eq!(info.currency, "RUB");
    }

    #[tokio::test]
    async fn test_countries_success() {
        let server = MockServer::start().await;

        let mut body = account_envelope();
        body["list"] = serde_json::json!(["ru", "ua", "us"]);

        Mock::given(method("GET"))
            .and(path(format!("/{TEST_API_KEY}/getcountries")))
            .and(query_param("version", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let catalog = countries(&client, ProxyVersion::Ipv4Shared)
            .await
            .expect("should succeed");

        assert_eq!(catalog.countries, vec!["ru", "ua", "us"]);
    }

    #[tokio::test]
    async fn test_quote_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/{TEST_API_KEY}/getprice")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "no",
                "error_id": 220,
                "error": "Error count"
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let err = quote(&client, 0, 30, ProxyVersion::Ipv6)
            .await
            .expect_err("should fail");

        match err {
            Px6Error::Provider { code, message } => {
                assert_eq!(code, 220);
                assert_eq!(message, "Error count");
            }
            _ => panic!("Expected Provider error, got {:?}", err),
        }
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_availability_emits_span() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(account_envelope()))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server).await;
        let _ = availability(&client, "ua", ProxyVersion::Ipv6).await;

        assert!(logs_contain("px6::pricing::availability"));
        assert!(logs_contain("ua"));
    }
}

//! Proxy management: listing, purchase, renewal, deletion and per-proxy
//! settings.
//!
//! ## Example
//!
//! ```rust,no_run
//! use px6_core::client::Px6Client;
//! use px6_proxies::models::{ProxyState, ProxyType, ProxyVersion};
//! use px6_proxies::proxy::{self, ProxyListRequest, PurchaseRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Px6Client::new("your-key")?;
//!
//! // Buy two SOCKS proxies in the US for 30 days
//! let order = PurchaseRequest::builder()
//!     .count(2)
//!     .period(30)
//!     .country("us")
//!     .version(ProxyVersion::Ipv4)
//!     .proxy_type(ProxyType::Socks)
//!     .description("scrapers")
//!     .build()?;
//! let bought = proxy::purchase(&client, &order).await?;
//!
//! // Renew them for another week
//! let ids: Vec<u64> = bought.proxies.iter().map(|p| p.id).collect();
//! proxy::renew(&client, &ids, 7, false).await?;
//!
//! // List what is running
//! let request = ProxyListRequest::builder().state(ProxyState::Active).build();
//! let listing = proxy::list(&client, &request).await?;
//! for p in &listing.proxies {
//!     println!("{} {} until {}", p.id, p.address(), p.date_end);
//! }
//! # Ok(())
//! # }
//! ```

use px6_core::client::Px6Client;
use px6_core::error::{Px6Error, Px6Result};
use px6_core::models::{ApiMethod, QueryParams};
use serde::Deserialize;

use crate::de;
use crate::models::{GenericAck, ProxyRecord, ProxyState, ProxyType, ProxyVersion};

/// Page requested by [`ProxyListRequest`] when none is set.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size requested by [`ProxyListRequest`] when none is set.
pub const DEFAULT_LIMIT: u32 = 1000;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A request for one page of the account's proxies.
///
/// ```rust
/// use px6_proxies::models::ProxyState;
/// use px6_proxies::proxy::ProxyListRequest;
///
/// let request = ProxyListRequest::builder()
///     .state(ProxyState::Expiring)
///     .nokey(true)
///     .build();
/// assert_eq!(request.page(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyListRequest {
    state: ProxyState,
    description: Option<String>,
    nokey: bool,
    page: u32,
    limit: u32,
}

impl ProxyListRequest {
    /// Creates a new builder for a listing request.
    pub fn builder() -> ProxyListRequestBuilder {
        ProxyListRequestBuilder::default()
    }

    /// The page number requested.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// The page size requested.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub(crate) fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push("state", self.state.as_str())
            .push("page", self.page)
            .push("limit", self.limit)
            .push_non_empty("descr", self.description.as_deref())
            .flag("nokey", self.nokey);
        params
    }
}

impl Default for ProxyListRequest {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ProxyListRequest`].
#[derive(Debug, Default)]
pub struct ProxyListRequestBuilder {
    state: Option<ProxyState>,
    description: Option<String>,
    nokey: bool,
    page: Option<u32>,
    limit: Option<u32>,
}

impl ProxyListRequestBuilder {
    /// Only list proxies in this lease state. Defaults to [`ProxyState::All`].
    pub fn state(mut self, state: ProxyState) -> Self {
        self.state = Some(state);
        self
    }

    /// Only list proxies with this description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Leave login and password out of the response.
    pub fn nokey(mut self, nokey: bool) -> Self {
        self.nokey = nokey;
        self
    }

    /// Page number, starting at 1.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builds the request.
    pub fn build(self) -> ProxyListRequest {
        ProxyListRequest {
            state: self.state.unwrap_or_default(),
            description: self.description,
            nokey: self.nokey,
            page: self.page.unwrap_or(DEFAULT_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        }
    }
}

/// A proxy purchase order.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRequest {
    count: u32,
    period: u32,
    country: String,
    version: ProxyVersion,
    proxy_type: ProxyType,
    description: Option<String>,
    auto_prolong: bool,
    nokey: bool,
}

impl PurchaseRequest {
    /// Creates a new builder for a purchase order.
    pub fn builder() -> PurchaseRequestBuilder {
        PurchaseRequestBuilder::default()
    }

    /// Number of proxies ordered.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Country code the proxies are bought in.
    pub fn country(&self) -> &str {
        &self.country
    }

    pub(crate) fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push("count", self.count)
            .push("period", self.period)
            .push("country", &self.country)
            .push("version", self.version.as_str())
            .push("type", self.proxy_type.as_str())
            .push_non_empty("descr", self.description.as_deref())
            .flag("auto_prolong", self.auto_prolong)
            .flag("nokey", self.nokey);
        params
    }
}

/// Builder for [`PurchaseRequest`].
#[derive(Debug, Default)]
pub struct PurchaseRequestBuilder {
    count: Option<u32>,
    period: Option<u32>,
    country: Option<String>,
    version: Option<ProxyVersion>,
    proxy_type: Option<ProxyType>,
    description: Option<String>,
    auto_prolong: bool,
    nokey: bool,
}

impl PurchaseRequestBuilder {
    /// Number of proxies to buy (required).
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Lease period in days (required).
    pub fn period(mut self, period: u32) -> Self {
        self.period = Some(period);
        self
    }

    /// Country code, e.g. `"us"` (required).
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Proxy version. Defaults to [`ProxyVersion::Ipv6`].
    pub fn version(mut self, version: ProxyVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Protocol type. Defaults to [`ProxyType::Http`].
    pub fn proxy_type(mut self, proxy_type: ProxyType) -> Self {
        self.proxy_type = Some(proxy_type);
        self
    }

    /// Description attached to the new proxies.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Renew the proxies automatically when the lease ends.
    pub fn auto_prolong(mut self, auto_prolong: bool) -> Self {
        self.auto_prolong = auto_prolong;
        self
    }

    /// Leave login and password out of the response.
    pub fn nokey(mut self, nokey: bool) -> Self {
        self.nokey = nokey;
        self
    }

    /// Builds the order, validating required fields.
    ///
    /// # Errors
    ///
    /// Returns [`Px6Error::Builder`] if `count`, `period` or `country` is
    /// missing, or if `country` is empty.
    pub fn build(self) -> Px6Result<PurchaseRequest> {
        let count = self
            .count
            .ok_or_else(|| Px6Error::Builder("count is required".into()))?;
        let period = self
            .period
            .ok_or_else(|| Px6Error::Builder("period is required".into()))?;
        let country = self
            .country
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Px6Error::Builder("country is required".into()))?;

        Ok(PurchaseRequest {
            count,
            period,
            country,
            version: self.version.unwrap_or_default(),
            proxy_type: self.proxy_type.unwrap_or_default(),
            description: self.description,
            auto_prolong: self.auto_prolong,
            nokey: self.nokey,
        })
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One page of the account's proxies.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProxyCollection {
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
    /// Total number of proxies matching the filter, across all pages.
    #[serde(default, deserialize_with = "de::integer")]
    pub list_count: u64,
    /// Proxies on this page, in provider order.
    #[serde(rename = "list", default, deserialize_with = "de::keyed_or_list")]
    pub proxies: Vec<ProxyRecord>,
}

/// A purchase outcome.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PurchaseResult {
    /// Envelope status.
    #[serde(default, deserialize_with = "de::string")]
    pub status: String,
    /// Account id.
    #[serde(default, deserialize_with = "de::integer")]
    pub user_id: u64,
    /// Balance after the purchase.
    #[serde(default, deserialize_with = "de::float")]
    pub balance: f64,
    /// Balance currency.
    #[serde(default, deserialize_with = "de::string")]
    pub currency: String,
    /// Number of proxies bought.
    #[serde(default, deserialize_with = "de::integer")]
    pub count: u64,
    /// Amount charged.
    #[serde(default, deserialize_with = "de::float")]
    pub price: f64,
    /// Lease period in days.
    #[serde(default, deserialize_with = "de::integer")]
    pub period: u32,
    /// Country code.
    #[serde(default, deserialize_with = "de::string")]
    pub country: String,
    /// The new proxies.
    #[serde(rename = "list", default, deserialize_with = "de::keyed_or_list")]
    pub proxies: Vec<ProxyRecord>,
}

/// The new lease end of one renewed proxy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RenewalRecord {
    /// Proxy id.
    #[serde(default, deserialize_with = "de::integer")]
    pub id: u64,
    /// New lease end, formatted by the provider.
    #[serde(default, deserialize_with = "de::string")]
    pub date_end: String,
    /// New lease end as a Unix timestamp.
    #[serde(default, deserialize_with = "de::integer")]
    pub unixtime_end: u64,
}

/// A renewal outcome.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RenewalResult {
    /// Envelope status.
    #[serde(default, deserialize_with = "de::string")]
    pub status: String,
    /// Account id.
    #[serde(default, deserialize_with = "de::integer")]
    pub user_id: u64,
    /// Balance after the renewal.
    #[serde(default, deserialize_with = "de::float")]
    pub balance: f64,
    /// Balance currency.
    #[serde(default, deserialize_with = "de::string")]
    pub currency: String,
    /// Amount charged.
    #[serde(default, deserialize_with = "de::float")]
    pub price: f64,
    /// Renewal period in days.
    #[serde(default, deserialize_with = "de::integer")]
    pub period: u32,
    /// Number of proxies renewed.
    #[serde(default, deserialize_with = "de::integer")]
    pub count: u64,
    /// Per-proxy outcomes.
    #[serde(rename = "list", default, deserialize_with = "de::keyed_or_list")]
    pub proxies: Vec<RenewalRecord>,
}

/// A deletion outcome.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DeletionResult {
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
    /// Number of proxies removed.
    #[serde(default, deserialize_with = "de::integer")]
    pub count: u64,
}

/// A reachability check of one proxy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CheckResult {
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
    /// Id of the checked proxy.
    #[serde(default, deserialize_with = "de::integer")]
    pub proxy_id: u64,
    /// Whether the proxy answered.
    ///
    /// Unlike `ProxyRecord::active`, the provider sends a native JSON boolean
    /// here, so it is read as-is: a string such as `"1"` fails the decode.
    /// `null` reads as `false`.
    #[serde(default, deserialize_with = "de::strict_bool")]
    pub proxy_status: bool,
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Fetch one page of the account's proxies.
///
/// # Tracing
///
/// Emits a span named `px6::proxy::list` with fields `state`, `page` and `limit`.
#[tracing::instrument(
    name = "px6::proxy::list",
    skip(client, request),
    fields(state = %request.state, page = request.page, limit = request.limit)
)]
pub async fn list(client: &Px6Client, request: &ProxyListRequest) -> Px6Result<ProxyCollection> {
    tracing::debug!("listing proxies");

    let data = client
        .execute(ApiMethod::GetProxy, &request.query_params())
        .await?;
    let collection: ProxyCollection = de::decode(data)?;

    tracing::debug!(
        returned = collection.proxies.len(),
        total = collection.list_count,
        "proxies listed"
    );
    Ok(collection)
}

/// Switch the protocol of the given proxies.
///
/// # Tracing
///
/// Emits a span named `px6::proxy::set_type` with fields `proxies` and `proxy_type`.
#[tracing::instrument(
    name = "px6::proxy::set_type",
    skip(client, ids),
    fields(proxies = ids.len(), proxy_type = %proxy_type)
)]
pub async fn set_type(
    client: &Px6Client,
    ids: &[u64],
    proxy_type: ProxyType,
) -> Px6Result<GenericAck> {
    tracing::debug!("setting proxy type");

    let mut params = QueryParams::new();
    params
        .push_ids("ids", ids)
        .push("type", proxy_type.as_str());

    let data = client.execute(ApiMethod::SetType, &params).await?;
    de::decode(data)
}

/// Set the description of proxies selected by id and/or current description.
///
/// `old` and `ids` are filters; when both are absent the provider decides what
/// the update applies to.
///
/// # Tracing
///
/// Emits a span named `px6::proxy::set_description` with field `proxies`.
#[tracing::instrument(
    name = "px6::proxy::set_description",
    skip(client, new, old, ids),
    fields(proxies = ids.len())
)]
pub async fn set_description(
    client: &Px6Client,
    new: &str,
    old: Option<&str>,
    ids: &[u64],
) -> Px6Result<GenericAck> {
    tracing::debug!("setting proxy description");

    let mut params = QueryParams::new();
    params.push("new", new).push_non_empty("old", old);
    if !ids.is_empty() {
        params.push_ids("ids", ids);
    }

    let data = client.execute(ApiMethod::SetDescr, &params).await?;
    de::decode(data)
}

/// Buy proxies.
///
/// # Tracing
///
/// Emits a span named `px6::proxy::purchase` with fields `count` and `country`.
#[tracing::instrument(
    name = "px6::proxy::purchase",
    skip(client, request),
    fields(count = request.count, country = %request.country)
)]
pub async fn purchase(client: &Px6Client, request: &PurchaseRequest) -> Px6Result<PurchaseResult> {
    tracing::debug!("purchasing proxies");

    let data = client
        .execute(ApiMethod::Buy, &request.query_params())
        .await?;
    let result: PurchaseResult = de::decode(data)?;

    tracing::debug!(
        bought = result.proxies.len(),
        price = result.price,
        "purchase complete"
    );
    Ok(result)
}

/// Extend the lease of the given proxies by `period` days.
///
/// # Tracing
///
/// Emits a span named `px6::proxy::renew` with fields `proxies` and `period`.
#[tracing::instrument(
    name = "px6::proxy::renew",
    skip(client, ids),
    fields(proxies = ids.len())
)]
pub async fn renew(
    client: &Px6Client,
    ids: &[u64],
    period: u32,
    nokey: bool,
) -> Px6Result<RenewalResult> {
    tracing::debug!("renewing proxies");

    let mut params = QueryParams::new();
    params
        .push_ids("ids", ids)
        .push("period", period)
        .flag("nokey", nokey);

    let data = client.execute(ApiMethod::Prolong, &params).await?;
    let result: RenewalResult = de::decode(data)?;

    tracing::debug!(renewed = result.proxies.len(), "renewal complete");
    Ok(result)
}

/// Delete proxies selected by id and/or description.
///
/// Neither filter is required here; the provider rejects a request it
/// considers incomplete.
///
/// # Tracing
///
/// Emits a span named `px6::proxy::delete` with field `proxies`.
#[tracing::instrument(
    name = "px6::proxy::delete",
    skip(client, ids, description),
    fields(proxies = ids.len())
)]
pub async fn delete(
    client: &Px6Client,
    ids: &[u64],
    description: Option<&str>,
) -> Px6Result<DeletionResult> {
    tracing::debug!("deleting proxies");

    let mut params = QueryParams::new();
    if !ids.is_empty() {
        params.push_ids("ids", ids);
    }
    params.push_non_empty("descr", description);

    let data = client.execute(ApiMethod::Delete, &params).await?;
    let result: DeletionResult = de::decode(data)?;

    tracing::debug!(deleted = result.count, "deletion complete");
    Ok(result)
}

/// Check whether a proxy is reachable.
///
/// # Tracing
///
/// Emits a span named `px6::proxy::check` with field `proxy_id`.
#[tracing::instrument(name = "px6::proxy::check", skip(client))]
pub async fn check(client: &Px6Client, proxy_id: u64) -> Px6Result<CheckResult> {
    tracing::debug!("checking proxy");

    let mut params = QueryParams::new();
    params.push("ids", proxy_id);

    let data = client.execute(ApiMethod::Check, &params).await?;
    let result: CheckResult = de::decode(data)?;

    tracing::debug!(reachable = result.proxy_status, "check complete");
    Ok(result)
}

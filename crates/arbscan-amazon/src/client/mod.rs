//! HTTP client for the Amazon product lookup API.

mod batched;

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::AmazonError;
use crate::normalize::{lowest_offer_from_raw, match_from_raw};
use crate::types::{IdMatch, IdType, LowestOffer, RawLowestOffersResponse, RawMatchingResponse};

pub use batched::apply_lowest_offers;

pub const DEFAULT_BASE_URL: &str = "https://mws.amazonservices.com";

/// Maximum ids accepted by one matching call.
pub const MATCHING_BATCH_SIZE: usize = 5;

/// Maximum ASINs accepted by one lowest-offer call.
pub const LOWEST_OFFER_BATCH_SIZE: usize = 20;

/// Seller credentials sent with every request.
#[derive(Clone)]
pub struct AmazonCredentials {
    pub access_key: String,
    pub seller_id: String,
    pub marketplace_id: String,
}

impl AmazonCredentials {
    /// Builds credentials from optional configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`AmazonError::MissingCredential`] naming the first absent value.
    pub fn from_parts(
        access_key: Option<&str>,
        seller_id: Option<&str>,
        marketplace_id: &str,
    ) -> Result<Self, AmazonError> {
        Ok(Self {
            access_key: access_key
                .ok_or(AmazonError::MissingCredential("AMAZON_ACCESS_KEY"))?
                .to_owned(),
            seller_id: seller_id
                .ok_or(AmazonError::MissingCredential("AMAZON_SELLER_ID"))?
                .to_owned(),
            marketplace_id: marketplace_id.to_owned(),
        })
    }
}

impl fmt::Debug for AmazonCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmazonCredentials")
            .field("access_key", &"[redacted]")
            .field("seller_id", &"[redacted]")
            .field("marketplace_id", &self.marketplace_id)
            .finish()
    }
}

/// Client for the Amazon product lookup endpoints.
///
/// Throttling (429/503 with `Retry-After`) is reported, never retried.
pub struct AmazonClient {
    client: Client,
    credentials: AmazonCredentials,
    base_url: Url,
}

impl AmazonClient {
    /// Creates a client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AmazonError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: AmazonCredentials,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, AmazonError> {
        Self::with_base_url(credentials, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AmazonError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`AmazonError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        credentials: AmazonCredentials,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, AmazonError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| AmazonError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            credentials,
            base_url: parsed,
        })
    }

    /// Matches up to [`MATCHING_BATCH_SIZE`] identifiers in one call.
    ///
    /// # Errors
    ///
    /// Returns [`AmazonError::UnusablePayload`] if the body has no `results`
    /// array, or a transport, status, or deserialization error.
    pub async fn matching_page(
        &self,
        ids: &[String],
        id_type: IdType,
    ) -> Result<Vec<IdMatch>, AmazonError> {
        let mut params = vec![("IdType".to_string(), id_type.as_str().to_string())];
        params.extend(numbered("IdList.Id", ids));
        let url = self.build_url("products/matching", &params)?;
        let endpoint = url.path().to_owned();

        let raw: RawMatchingResponse = self.get_json(url).await?;
        let results = raw.results.ok_or_else(|| AmazonError::UnusablePayload {
            endpoint,
            reason: "response has no results".to_string(),
        })?;
        Ok(results.into_iter().map(match_from_raw).collect())
    }

    /// Fetches the cheapest new-condition offer for up to
    /// [`LOWEST_OFFER_BATCH_SIZE`] ASINs. ASINs with no offers are omitted.
    ///
    /// # Errors
    ///
    /// Same as [`Self::matching_page`].
    pub async fn lowest_offers_page(&self, asins: &[String]) -> Result<Vec<LowestOffer>, AmazonError> {
        let mut params = vec![("ItemCondition".to_string(), "New".to_string())];
        params.extend(numbered("ASINList.ASIN", asins));
        let url = self.build_url("products/lowest-offers", &params)?;
        let endpoint = url.path().to_owned();

        let raw: RawLowestOffersResponse = self.get_json(url).await?;
        let results = raw.results.ok_or_else(|| AmazonError::UnusablePayload {
            endpoint,
            reason: "response has no results".to_string(),
        })?;
        Ok(results.into_iter().filter_map(lowest_offer_from_raw).collect())
    }

    fn build_url(&self, path: &str, extra: &[(String, String)]) -> Result<Url, AmazonError> {
        let mut url = self.base_url.join(path).map_err(|e| AmazonError::InvalidBaseUrl {
            base_url: self.base_url.to_string(),
            reason: format!("cannot join \"{path}\": {e}"),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("AWSAccessKeyId", &self.credentials.access_key);
            pairs.append_pair("SellerId", &self.credentials.seller_id);
            pairs.append_pair("MarketplaceId", &self.credentials.marketplace_id);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AmazonError> {
        let endpoint = url.path().to_owned();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        // The marketplace signals throttling with 503 as often as 429.
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || retry_after_secs.is_some() {
                return Err(AmazonError::RateLimited {
                    endpoint,
                    retry_after_secs: retry_after_secs.unwrap_or(60),
                });
            }
        }

        if !status.is_success() {
            return Err(AmazonError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint,
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| AmazonError::Deserialize {
            context: endpoint,
            source: e,
        })
    }
}

/// `Prefix.1=a&Prefix.2=b...` list parameters, numbered from one.
fn numbered(prefix: &str, values: &[String]) -> Vec<(String, String)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("{prefix}.{}", i + 1), v.clone()))
        .collect()
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

//! HTTP client for the Walmart open catalog API.

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::WalmartError;
use crate::query::{ItemsQuery, SpecialFeed};
use crate::types::{ItemsPage, ItemsPayload, RawItem, RawItemsResponse, Taxonomy};

pub const DEFAULT_BASE_URL: &str = "http://api.walmartlabs.com";

/// Maximum item ids accepted by one `GET /v1/items` call.
pub const LOOKUP_BATCH_SIZE: usize = 20;

/// Client for the Walmart catalog API.
///
/// Every request carries the `apiKey` query parameter. Rate limiting (429)
/// and other non-2xx responses surface as typed errors and are never
/// retried here; callers space requests with a fixed schedule instead.
pub struct WalmartClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl WalmartClient {
    /// Creates a client pointed at the production catalog API.
    ///
    /// # Errors
    ///
    /// Returns [`WalmartError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, WalmartError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (configuration override or a
    /// wiremock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`WalmartError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`WalmartError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, WalmartError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Trailing slash so relative joins append to any path prefix.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| WalmartError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// Fetches the full category tree.
    ///
    /// # Errors
    ///
    /// Returns a transport, status, or deserialization error.
    pub async fn taxonomy(&self) -> Result<Taxonomy, WalmartError> {
        let url = self.build_url("v1/taxonomy", &[])?;
        self.get_json(url).await
    }

    /// Fetches one special feed, optionally restricted to a category.
    ///
    /// # Errors
    ///
    /// Returns [`WalmartError::UnusablePayload`] when the body has no items,
    /// or a transport, status, or deserialization error.
    pub async fn feed(
        &self,
        feed: SpecialFeed,
        category_id: Option<&str>,
    ) -> Result<Vec<RawItem>, WalmartError> {
        let mut params = Vec::new();
        if let Some(category) = category_id {
            params.push(("categoryId", category.to_string()));
        }
        let url = self.build_url(&format!("v1/feeds/{}", feed.as_str()), &params)?;
        Ok(self.get_items(url).await?.items)
    }

    /// Fetches the trending-items list.
    ///
    /// # Errors
    ///
    /// Same as [`Self::feed`].
    pub async fn trending(&self) -> Result<Vec<RawItem>, WalmartError> {
        let url = self.build_url("v1/trends", &[])?;
        Ok(self.get_items(url).await?.items)
    }

    /// Fetches the first page of a paginated items query.
    ///
    /// # Errors
    ///
    /// Same as [`Self::feed`].
    pub async fn paginated_items(&self, query: &ItemsQuery) -> Result<ItemsPage, WalmartError> {
        let url = self.build_url("v1/paginated/items", &query.params())?;
        self.get_items(url).await
    }

    /// Follows a `nextPage` cursor returned by a previous page.
    ///
    /// The cursor is a path plus query relative to the API host. `apiKey` is
    /// added when the cursor does not already carry it.
    ///
    /// # Errors
    ///
    /// Returns [`WalmartError::UnusablePayload`] if the cursor is not a
    /// host-relative path, otherwise the same errors as [`Self::feed`].
    pub async fn next_page(&self, cursor: &str) -> Result<ItemsPage, WalmartError> {
        let url = self.cursor_url(cursor)?;
        self.get_items(url).await
    }

    /// Looks up up to [`LOOKUP_BATCH_SIZE`] items by Walmart item id.
    ///
    /// # Errors
    ///
    /// Same as [`Self::feed`].
    pub async fn lookup_items_page(&self, item_ids: &[String]) -> Result<Vec<RawItem>, WalmartError> {
        let url = self.build_url("v1/items", &[("ids", item_ids.join(","))])?;
        Ok(self.get_items(url).await?.items)
    }

    fn build_url(&self, path: &str, extra: &[(&str, String)]) -> Result<Url, WalmartError> {
        let mut url = self.base_url.join(path).map_err(|e| WalmartError::InvalidBaseUrl {
            base_url: self.base_url.to_string(),
            reason: format!("cannot join \"{path}\": {e}"),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apiKey", &self.api_key);
            pairs.append_pair("format", "json");
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    fn cursor_url(&self, cursor: &str) -> Result<Url, WalmartError> {
        let cursor = cursor.trim();
        if !cursor.starts_with('/') {
            return Err(WalmartError::UnusablePayload {
                endpoint: "nextPage".to_string(),
                reason: "cursor is not a host-relative path".to_string(),
            });
        }
        let mut url = self
            .base_url
            .join(cursor.trim_start_matches('/'))
            .map_err(|e| WalmartError::UnusablePayload {
                endpoint: "nextPage".to_string(),
                reason: format!("cursor does not form a URL: {e}"),
            })?;
        if !url.query_pairs().any(|(k, _)| k == "apiKey") {
            url.query_pairs_mut().append_pair("apiKey", &self.api_key);
        }
        Ok(url)
    }

    async fn get_items(&self, url: Url) -> Result<ItemsPage, WalmartError> {
        let endpoint = url.path().to_owned();
        let raw: RawItemsResponse = self.get_json(url).await?;
        match raw.into_payload() {
            ItemsPayload::Items { items, next_page } => Ok(ItemsPage { items, next_page }),
            ItemsPayload::Unusable { reason } => {
                Err(WalmartError::UnusablePayload { endpoint, reason })
            }
        }
    }

    /// Sends a GET and maps the response to `T`.
    ///
    /// Errors name the endpoint path only, never the full URL, so the API key
    /// stays out of logs.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, WalmartError> {
        let endpoint = url.path().to_owned();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(WalmartError::RateLimited {
                endpoint,
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(WalmartError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint,
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| WalmartError::Deserialize {
            context: endpoint,
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;

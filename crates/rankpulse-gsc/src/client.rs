//! HTTP client for the Search Console (webmasters v3) API.
//!
//! Wraps `reqwest` with bearer-token auth, typed deserialization, and the
//! transient-error retry policy from [`crate::retry`]. CTR is converted
//! from the API's fraction form to percent here, so nothing downstream
//! ever sees a fractional CTR.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Url};

use crate::error::GscError;
use crate::retry::retry_with_backoff;
use crate::types::{Dimension, GscSite, PerformanceRow, QueryRequest, QueryResponse, SiteListResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/";
const DEFAULT_ROW_LIMIT: u32 = 1_000;

/// Client for the Search Console API.
///
/// Construct one explicitly and pass it where needed; there is no shared
/// module-level instance. Use [`GscClient::with_base_url`] to point at a
/// mock server in tests.
pub struct GscClient {
    client: Client,
    access_token: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GscClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`GscError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(access_token: &str, timeout_secs: u64) -> Result<Self, GscError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GscError::Http`] if the HTTP client cannot be constructed,
    /// or [`GscError::Api`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GscError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rankpulse/0.1 (search-reporting)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GscError::Api {
            code: 0,
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url,
            max_retries: 2,
            backoff_base_ms: 500,
        })
    }

    /// Overrides the retry policy (attempts beyond the first, base delay).
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Lists the sites the credential has access to.
    ///
    /// # Errors
    ///
    /// - [`GscError::Api`] if the API returns an error envelope.
    /// - [`GscError::Http`] on network failure.
    /// - [`GscError::Deserialize`] if the response shape is unexpected.
    pub async fn list_sites(&self) -> Result<Vec<GscSite>, GscError> {
        let url = self.endpoint(&["webmasters", "v3", "sites"]);
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.get_json(url.clone())
        })
        .await?;

        let parsed: SiteListResponse =
            serde_json::from_value(body).map_err(|e| GscError::Deserialize {
                context: "sites.list".to_owned(),
                source: e,
            })?;
        Ok(parsed.site_entry)
    }

    /// Runs a search-analytics query for `site_url` over `[start, end]`
    /// with a single dimension, returning boundary-normalized rows
    /// (`keys[0]` as the row key, CTR in percent).
    ///
    /// # Errors
    ///
    /// - [`GscError::Api`] if the API returns an error envelope.
    /// - [`GscError::Http`] on network failure.
    /// - [`GscError::Deserialize`] if the response shape is unexpected.
    pub async fn query(
        &self,
        site_url: &str,
        start: NaiveDate,
        end: NaiveDate,
        dimension: Dimension,
    ) -> Result<Vec<PerformanceRow>, GscError> {
        let url = self.endpoint(&[
            "webmasters",
            "v3",
            "sites",
            site_url,
            "searchAnalytics",
            "query",
        ]);
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        let request = QueryRequest {
            start_date: &start,
            end_date: &end,
            dimensions: [dimension.as_api_str()],
            row_limit: DEFAULT_ROW_LIMIT,
        };

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.post_json(url.clone(), &request)
        })
        .await?;

        let parsed: QueryResponse =
            serde_json::from_value(body).map_err(|e| GscError::Deserialize {
                context: format!("searchAnalytics.query(site={site_url})"),
                source: e,
            })?;
        Ok(parsed.rows.into_iter().map(PerformanceRow::from).collect())
    }

    /// Builds an endpoint URL, percent-encoding each path segment. The
    /// site identifier is one segment (`sc-domain:a.com`,
    /// `https://a.com/`), exactly as the API expects it.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("base URL validated at construction");
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }

    async fn get_json(&self, url: Url) -> Result<serde_json::Value, GscError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::parse_response(&url, response).await
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<serde_json::Value, GscError> {
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        Self::parse_response(&url, response).await
    }

    /// Parses a response body, surfacing the API's error envelope as
    /// [`GscError::Api`] for non-2xx statuses.
    async fn parse_response(
        url: &Url,
        response: reqwest::Response,
    ) -> Result<serde_json::Value, GscError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| {
                    v.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(serde_json::Value::as_str)
                        .map(ToOwned::to_owned)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(GscError::Api {
                code: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| GscError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

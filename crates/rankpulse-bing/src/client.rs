//! HTTP client for the Bing Webmaster JSON API.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::dates::parse_stat_date;
use crate::error::BingError;
use crate::types::{unwrap_envelope, BingSite, DailyStat, RawTrafficStat};

const DEFAULT_BASE_URL: &str = "https://ssl.bing.com/webmaster/api.svc/json/";

/// Client for the Bing Webmaster API.
///
/// Construct one explicitly and pass it where needed; there is no shared
/// module-level instance. Use [`BingClient::with_base_url`] to point at a
/// mock server in tests.
pub struct BingClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl BingClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`BingError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, BingError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`BingError::Http`] if the HTTP client cannot be
    /// constructed, or [`BingError::Api`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, BingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rankpulse/0.1 (search-reporting)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BingError::Api {
            code: 0,
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Lists the sites registered under the API key.
    ///
    /// # Errors
    ///
    /// - [`BingError::Api`] on a non-2xx response.
    /// - [`BingError::Http`] on network failure.
    /// - [`BingError::Deserialize`] if the payload shape is unexpected.
    pub async fn get_user_sites(&self) -> Result<Vec<BingSite>, BingError> {
        let url = self.endpoint("GetUserSites", &[]);
        let body = self.request_json(&url).await?;
        unwrap_envelope("GetUserSites", body)
    }

    /// Fetches daily rank-and-traffic stats for one site.
    ///
    /// Rows whose date field cannot be parsed in either wire form are
    /// dropped with a warning; a malformed row never fails the fetch.
    /// The stats endpoint is sensitive to the exact URL string; see
    /// [`crate::probe`] for the variant-probing wrapper.
    ///
    /// # Errors
    ///
    /// - [`BingError::Api`] on a non-2xx response.
    /// - [`BingError::Http`] on network failure.
    /// - [`BingError::Deserialize`] if the payload shape is unexpected.
    pub async fn get_rank_and_traffic_stats(
        &self,
        site_url: &str,
    ) -> Result<Vec<DailyStat>, BingError> {
        let url = self.endpoint("GetRankAndTrafficStats", &[("siteUrl", site_url)]);
        let body = self.request_json(&url).await?;
        let raw: Vec<RawTrafficStat> = unwrap_envelope("GetRankAndTrafficStats", body)?;

        let mut stats = Vec::with_capacity(raw.len());
        for row in raw {
            match parse_stat_date(&row.date) {
                Some(date) => stats.push(DailyStat {
                    date,
                    clicks: row.clicks,
                    impressions: row.impressions,
                }),
                None => {
                    tracing::warn!(site = site_url, date = %row.date, "dropping stat row with unparseable date");
                }
            }
        }
        Ok(stats)
    }

    /// Builds the endpoint URL with `apikey` plus any extra query params.
    fn endpoint(&self, op: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("base URL validated at construction");
            path.push(op);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apikey", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, BingError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let mut message = text;
            message.truncate(200);
            return Err(BingError::Api {
                code: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| BingError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

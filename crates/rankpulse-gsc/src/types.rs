//! Search Console API request/response types.

use serde::{Deserialize, Serialize};

/// Response envelope for the sites listing.
#[derive(Debug, Deserialize)]
pub struct SiteListResponse {
    #[serde(default, rename = "siteEntry")]
    pub site_entry: Vec<GscSite>,
}

/// One entry from the account's site inventory.
///
/// `site_url` is either a URL-prefix property (`https://a.com/`) or a
/// domain property (`sc-domain:a.com`).
#[derive(Debug, Clone, Deserialize)]
pub struct GscSite {
    #[serde(rename = "siteUrl")]
    pub site_url: String,
    #[serde(default, rename = "permissionLevel")]
    pub permission_level: Option<String>,
}

/// Dimension selector for a search-analytics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Date,
    Month,
    Query,
}

impl Dimension {
    pub(crate) fn as_api_str(self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::Month => "month",
            Dimension::Query => "query",
        }
    }
}

/// Body of a `searchAnalytics/query` request.
#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    #[serde(rename = "startDate")]
    pub start_date: &'a str,
    #[serde(rename = "endDate")]
    pub end_date: &'a str,
    pub dimensions: [&'static str; 1],
    #[serde(rename = "rowLimit")]
    pub row_limit: u32,
}

/// Response envelope for `searchAnalytics/query`.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

/// A row as delivered on the wire: fractional CTR, float counts.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRow {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub clicks: f64,
    #[serde(default)]
    pub impressions: f64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub position: Option<f64>,
}

/// A performance row after boundary normalization.
///
/// `key` is the first dimension value (a date, a month label, or a query
/// term, or empty when the API omitted keys). `ctr` is in percent; the
/// fraction→percent conversion happens exactly once, here in the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    pub key: String,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub position: Option<f64>,
}

impl From<RawRow> for PerformanceRow {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from(raw: RawRow) -> Self {
        let key = raw.keys.into_iter().next().unwrap_or_default();
        Self {
            key,
            clicks: raw.clicks.max(0.0).round() as u64,
            impressions: raw.impressions.max(0.0).round() as u64,
            ctr: raw.ctr * 100.0,
            position: raw.position.filter(|p| p.is_finite()),
        }
    }
}

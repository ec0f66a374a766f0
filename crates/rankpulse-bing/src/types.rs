//! Bing Webmaster API response types.
//!
//! The JSON endpoints usually wrap their payload in a `{"d": ...}`
//! envelope, but some endpoint versions return the bare payload;
//! [`unwrap_envelope`] supports both.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::BingError;

/// One entry from the account's site inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct BingSite {
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(default, rename = "IsVerified")]
    pub is_verified: bool,
    #[serde(default, rename = "Role")]
    pub role: Option<String>,
}

/// A rank-and-traffic row as delivered on the wire. `Date` may be an ISO
/// string or the legacy `/Date(<epoch-millis>)/` token.
#[derive(Debug, Deserialize)]
pub(crate) struct RawTrafficStat {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(default, rename = "Clicks")]
    pub clicks: u64,
    #[serde(default, rename = "Impressions")]
    pub impressions: u64,
}

/// A traffic row after date normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub clicks: u64,
    pub impressions: u64,
}

/// Peels the optional `{"d": ...}` wrapper and deserializes the payload.
pub(crate) fn unwrap_envelope<T: serde::de::DeserializeOwned>(
    context: &str,
    body: serde_json::Value,
) -> Result<T, BingError> {
    let payload = match body {
        serde_json::Value::Object(mut map) if map.contains_key("d") => {
            map.remove("d").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| BingError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

//! Secondary provider adapter: Bing Webmaster site inventory and
//! rank-and-traffic stats, including the URL variant probe.

mod client;
mod dates;
mod error;
pub mod probe;
mod types;

pub use client::BingClient;
pub use dates::parse_stat_date;
pub use error::BingError;
pub use probe::{candidate_variants, probe_stats, MAX_PROBE_ATTEMPTS};
pub use types::{BingSite, DailyStat};

/// Fetches stats for `site_url`, falling back to the URL variant probe
/// when the known string yields nothing.
///
/// # Errors
///
/// Returns [`BingError::Http`] when the provider is unreachable.
pub async fn fetch_stats_with_probe(
    client: &BingClient,
    site_url: &str,
) -> Result<Vec<DailyStat>, BingError> {
    probe_stats(site_url, |candidate| async move {
        client.get_rank_and_traffic_stats(&candidate).await
    })
    .await
}

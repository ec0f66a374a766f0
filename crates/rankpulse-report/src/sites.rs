//! Cross-provider inventory resolution.

use futures::join;
use rankpulse_core::{match_inventories, SiteMatches};

use crate::error::ReportError;
use crate::providers::Providers;

/// Fetches both providers' inventories concurrently and intersects them
/// on the normalized domain key. With no Bing client configured the
/// secondary inventory is empty, so every Google site lands in
/// `primary_only`.
///
/// # Errors
///
/// Returns [`ReportError::Gsc`] or [`ReportError::Bing`] when an
/// inventory fetch fails; without the inventories no identifier can be
/// resolved, so this is not downgraded.
pub async fn site_inventories(providers: &Providers) -> Result<SiteMatches, ReportError> {
    let gsc_sites = providers.gsc.list_sites();
    let bing_sites = async {
        match providers.bing.as_ref() {
            Some(client) => client.get_user_sites().await.map(Some),
            None => Ok(None),
        }
    };

    let (gsc_sites, bing_sites) = join!(gsc_sites, bing_sites);

    let primary: Vec<String> = gsc_sites?.into_iter().map(|s| s.site_url).collect();
    let secondary: Vec<String> = bing_sites?
        .map(|sites| sites.into_iter().map(|s| s.url).collect())
        .unwrap_or_default();

    Ok(match_inventories(&primary, &secondary))
}

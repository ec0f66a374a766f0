//! URL variant probing for the rank-and-traffic stats endpoint.
//!
//! The stats endpoint is sensitive to the exact URL string in a way the
//! site inventory is not: a site registered as `http://www.a.com` may only
//! answer stats queries for `https://a.com/`. When the known string comes
//! back empty or rejected, the probe walks a bounded, precomputed list of
//! protocol × `www` × trailing-slash permutations until one yields data.

use std::future::Future;

use crate::error::BingError;
use crate::types::DailyStat;

/// Hard cap on stats requests per probe, the known URL included.
pub const MAX_PROBE_ATTEMPTS: usize = 8;

/// Builds the deterministic candidate list for one probe: the original
/// string first, then the `{https, http} × {bare, www.} × {none, /}`
/// permutations of the stripped base, deduplicated, capped at
/// [`MAX_PROBE_ATTEMPTS`] entries.
#[must_use]
pub fn candidate_variants(original: &str) -> Vec<String> {
    let base = stripped_base(original);
    let mut candidates = Vec::with_capacity(MAX_PROBE_ATTEMPTS);
    candidates.push(original.to_owned());

    for scheme in ["https://", "http://"] {
        for www in ["", "www."] {
            for slash in ["", "/"] {
                let candidate = format!("{scheme}{www}{base}{slash}");
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
    }

    candidates.truncate(MAX_PROBE_ATTEMPTS);
    candidates
}

/// Runs the probe: tries each candidate in turn through `fetch` and
/// returns the first non-empty result.
///
/// The sequencing is deliberate: each attempt's outcome decides whether
/// the next happens, so candidates must not be fetched in parallel.
/// An application-level rejection counts as a miss and the probe moves
/// on; exhaustion yields an empty result, which is the valid terminal
/// state for a connected-but-quiet site.
///
/// # Errors
///
/// Returns [`BingError::Http`] as soon as the provider is unreachable;
/// a dead provider is not the same as a site with no data, and retrying
/// seven more variants against it would only burn quota.
pub async fn probe_stats<F, Fut>(original_url: &str, mut fetch: F) -> Result<Vec<DailyStat>, BingError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<DailyStat>, BingError>>,
{
    for candidate in candidate_variants(original_url) {
        match fetch(candidate.clone()).await {
            Ok(stats) if !stats.is_empty() => {
                if candidate != original_url {
                    tracing::debug!(
                        original = original_url,
                        resolved = %candidate,
                        "stats resolved under a URL variant"
                    );
                }
                return Ok(stats);
            }
            Ok(_) => {
                tracing::debug!(candidate = %candidate, "probe returned no rows");
            }
            Err(err @ BingError::Http(_)) => return Err(err),
            Err(err) => {
                tracing::debug!(candidate = %candidate, error = %err, "probe rejected");
            }
        }
    }

    Ok(Vec::new())
}

fn stripped_base(original: &str) -> String {
    let mut rest = original.trim();
    for prefix in ["https://", "http://"] {
        if rest.len() >= prefix.len() && rest[..prefix.len()].eq_ignore_ascii_case(prefix) {
            rest = &rest[prefix.len()..];
            break;
        }
    }
    if rest.len() >= 4 && rest[..4].eq_ignore_ascii_case("www.") {
        rest = &rest[4..];
    }
    rest.strip_suffix('/').unwrap_or(rest).to_owned()
}

//! Cross-provider site matching on the normalized domain key.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain_key::normalize_site_key;

/// A site present in both provider inventories, carrying each provider's
/// exact identifier string for downstream API calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedSite {
    pub key: String,
    pub primary_url: String,
    pub secondary_url: String,
}

/// A site present in only one provider's inventory. Bookkeeping only;
/// excluded from cross-provider reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedSite {
    pub key: String,
    pub url: String,
}

/// Result of intersecting two provider inventories.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteMatches {
    pub matched: Vec<MatchedSite>,
    pub primary_only: Vec<UnmatchedSite>,
    pub secondary_only: Vec<UnmatchedSite>,
}

impl SiteMatches {
    /// Looks up the matched entry for a normalized key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&MatchedSite> {
        self.matched.iter().find(|m| m.key == key)
    }
}

/// Intersects two site inventories by normalized-key equality.
///
/// Matching is exact on the normalized key; no fuzzy or partial-path
/// matching. When one provider lists several identifiers that normalize to
/// the same key (`https://a.com/` and `sc-domain:a.com`), the first one
/// wins. Identifiers that normalize to an empty key are ignored. Output
/// ordering is deterministic (sorted by key).
#[must_use]
pub fn match_inventories(primary: &[String], secondary: &[String]) -> SiteMatches {
    let primary_by_key = index_by_key(primary);
    let secondary_by_key = index_by_key(secondary);

    let mut matches = SiteMatches::default();

    for (key, primary_url) in &primary_by_key {
        match secondary_by_key.get(key) {
            Some(secondary_url) => matches.matched.push(MatchedSite {
                key: key.clone(),
                primary_url: primary_url.clone(),
                secondary_url: secondary_url.clone(),
            }),
            None => matches.primary_only.push(UnmatchedSite {
                key: key.clone(),
                url: primary_url.clone(),
            }),
        }
    }

    for (key, secondary_url) in &secondary_by_key {
        if !primary_by_key.contains_key(key) {
            matches.secondary_only.push(UnmatchedSite {
                key: key.clone(),
                url: secondary_url.clone(),
            });
        }
    }

    matches
}

fn index_by_key(urls: &[String]) -> BTreeMap<String, String> {
    let mut index = BTreeMap::new();
    for url in urls {
        let key = normalize_site_key(url);
        if key.is_empty() {
            continue;
        }
        index.entry(key).or_insert_with(|| url.clone());
    }
    index
}

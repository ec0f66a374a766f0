//! Canonicalization of heterogeneous site identifiers into one lowercase
//! join key.
//!
//! The two providers register the same site under different strings:
//! `sc-domain:a.com`, `https://a.com/`, `http://www.a.com`, `a.com`. All of
//! them must normalize to the same key so inventories can be intersected.

use url::Url;

/// Search Console "domain property" marker.
const DOMAIN_PROPERTY_PREFIX: &str = "sc-domain:";

/// Normalizes a free-form site identifier into a canonical lowercase key.
///
/// Strips the domain-property marker, protocol, and `www.`; separates host
/// from path via URL parsing (with a best-effort textual fallback when the
/// remainder does not parse); drops a bare `/` path and a single trailing
/// slash otherwise. Empty input yields an empty string; this function
/// never fails. Idempotent: normalizing an already-normalized key returns
/// it unchanged.
#[must_use]
pub fn normalize_site_key(raw: &str) -> String {
    let mut rest = raw.trim();

    if let Some(stripped) = strip_prefix_ci(rest, DOMAIN_PROPERTY_PREFIX) {
        rest = stripped;
    }
    rest = strip_protocol(rest);
    if let Some(stripped) = strip_prefix_ci(rest, "www.") {
        rest = stripped;
    }

    if rest.is_empty() {
        return String::new();
    }

    // Re-attach a synthetic scheme so the URL parser can split host from
    // path; registered identifiers sometimes carry a path component
    // (`https://a.com/shop/`) that must survive normalization.
    match Url::parse(&format!("https://{rest}")) {
        Ok(url) => match url.host_str() {
            Some(host) => {
                // Defends against double-prefixed identifiers like
                // `https://www.www.a.com`.
                let host = strip_prefix_ci(host, "www.").unwrap_or(host);
                let path = match url.path() {
                    "/" => "",
                    p => p.strip_suffix('/').unwrap_or(p),
                };
                format!("{host}{path}").to_lowercase()
            }
            None => textual_fallback(rest),
        },
        Err(_) => textual_fallback(rest),
    }
}

/// Best-effort stripping when the identifier is not URL-parseable.
fn textual_fallback(rest: &str) -> String {
    rest.strip_suffix('/').unwrap_or(rest).to_lowercase()
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn strip_protocol(s: &str) -> &str {
    strip_prefix_ci(s, "https://")
        .or_else(|| strip_prefix_ci(s, "http://"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_of_the_same_site_share_one_key() {
        let forms = [
            "https://a.com/",
            "http://a.com",
            "https://www.a.com/",
            "WWW.A.COM",
            "sc-domain:a.com",
            "a.com",
        ];
        for form in forms {
            assert_eq!(normalize_site_key(form), "a.com", "input: {form}");
        }
    }

    #[test]
    fn keeps_non_root_paths_without_trailing_slash() {
        assert_eq!(normalize_site_key("https://a.com/shop/"), "a.com/shop");
        assert_eq!(normalize_site_key("a.com/shop"), "a.com/shop");
    }

    #[test]
    fn empty_input_yields_empty_key() {
        assert_eq!(normalize_site_key(""), "");
        assert_eq!(normalize_site_key("   "), "");
    }

    #[test]
    fn idempotent_on_already_normalized_keys() {
        for raw in ["https://www.a.com/shop/", "sc-domain:b.example", "c.com"] {
            let once = normalize_site_key(raw);
            assert_eq!(normalize_site_key(&once), once, "input: {raw}");
        }
    }

    #[test]
    fn malformed_input_degrades_to_textual_stripping() {
        // Spaces make the synthetic URL unparseable; no panic, best effort.
        assert_eq!(normalize_site_key("http://bad host/"), "bad host");
    }

    #[test]
    fn double_www_prefix_is_fully_stripped() {
        assert_eq!(normalize_site_key("https://www.www.a.com"), "a.com");
    }

    #[test]
    fn lowercases_mixed_case_identifiers() {
        assert_eq!(normalize_site_key("HTTPS://Example.COM/Path"), "example.com/path");
    }
}

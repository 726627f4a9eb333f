//! Canonical URL form used for dedup.
//!
//! Two listings for the same role frequently differ only in tracking
//! parameters or host casing, so every stored job carries a normalized
//! URL with a UNIQUE index on it.

use url::Url;

/// Query parameters that carry tracking state rather than identity.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "ref",
    "source",
    "track",
    "fbclid",
    "gclid",
    "msclkid",
    "referer",
    "referrer",
    "origin",
    "campaign",
];

/// Normalizes a URL for duplicate detection: lowercases it, drops a
/// leading `www.`, removes tracking parameters, and trims a single
/// trailing slash. Unparseable input falls back to the lowercased raw
/// string so dedup still behaves consistently.
pub fn normalize_url(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let mut url = match Url::parse(&lowered) {
        Ok(url) => url,
        Err(_) => return lowered,
    };

    if let Some(host) = url.host_str() {
        if let Some(bare) = host.strip_prefix("www.") {
            let bare = bare.to_string();
            // Hosts that were only "www." would become empty; keep those as-is.
            if !bare.is_empty() {
                let _ = url.set_host(Some(&bare));
            }
        }
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.set_query(None);
    if !kept.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
    }

    let out = url.to_string();
    // One slash only: a double slash is an empty path segment, and path
    // segments are identity.
    match out.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => out,
    }
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

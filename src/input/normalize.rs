// src/input/normalize.rs
// =============================================================================
// The input normalizer.
//
// Steps, in order:
// 1. Split the text on newlines and commas
// 2. Trim each piece, drop empty ones
// 3. Prefix "https://" when the piece has no http:// or https:// scheme
// 4. Keep only pieces that parse as absolute http(s) URLs with a usable host
//
// Order is preserved and duplicates are kept: the same URL pasted twice is
// probed twice and shows up twice in the results.
// =============================================================================

use tracing::{debug, warn};
use url::{Host, Url};

/// One piece of user input, before and after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCandidate {
    /// The trimmed text as the user typed it
    pub raw: String,
    /// The text with a scheme added when it had none
    pub normalized: String,
    /// Whether `normalized` parsed as a probe-able URL
    pub valid: bool,
}

/// Splits and normalizes `text`, returning every non-empty piece.
///
/// Invalid pieces are kept (with `valid == false`) so callers can report
/// what was skipped. Use [`normalize`] when only the valid URLs matter.
pub fn candidates(text: &str) -> Vec<UrlCandidate> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let normalized = with_scheme(piece);
            let valid = is_probeable(&normalized);
            if !valid {
                warn!("Skipping invalid URL: {}", piece);
            }
            UrlCandidate {
                raw: piece.to_string(),
                normalized,
                valid,
            }
        })
        .collect()
}

/// Returns the valid, scheme-qualified URLs found in `text`, in input order.
///
/// An empty result means nothing usable was submitted; callers treat that as
/// a validation failure before any network activity.
///
/// # Example
///
/// ```
/// use link_prober::normalize;
///
/// let urls = normalize("example.com, https://bad..url, ");
/// assert_eq!(urls, vec!["https://example.com".to_string()]);
/// ```
pub fn normalize(text: &str) -> Vec<String> {
    let urls: Vec<String> = candidates(text)
        .into_iter()
        .filter(|candidate| candidate.valid)
        .map(|candidate| candidate.normalized)
        .collect();
    debug!("Normalized input into {} URL(s)", urls.len());
    urls
}

fn with_scheme(piece: &str) -> String {
    if has_http_scheme(piece) {
        piece.to_string()
    } else {
        format!("https://{}", piece)
    }
}

fn has_http_scheme(piece: &str) -> bool {
    let lower = piece
        .get(..8)
        .unwrap_or(piece)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

// The URL parser is lenient about hostnames ("bad..url" parses), so the host
// is checked separately: domains need non-empty labels, a single trailing dot
// is allowed.
fn is_probeable(candidate: &str) -> bool {
    let Ok(url) = Url::parse(candidate) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.strip_suffix('.').unwrap_or(domain);
            !domain.is_empty() && domain.split('.').all(|label| !label.is_empty())
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    }
}

// src/checker/probe.rs
// =============================================================================
// Probes one URL: status, timing, redirect target, headers and, for HTML
// pages, title / meta description / canonical link.
//
// Flow for one URL:
// 1. HEAD request (follows redirects, bounded by the configured timeout)
//    - network failure or timeout -> failed result, stop here
// 2. Record status, final URL and headers from the HEAD response
// 3. If status is 2xx and Content-Type is HTML -> GET the original URL
//    and scrape the page. This step can only add fields; any failure in it
//    is logged and ignored.
//
// Each request gets its own timeout, so a slow HEAD never eats into the
// GET's budget and vice versa. The GET body is read only up to a byte
// budget, so a huge page costs at most that much memory.
//
// Rust concepts:
// - async/await: each probe is a future the batch runner polls concurrently
// - Result vs. plain values: the probe turns every error into data
// - Borrowing: the prober is shared by reference across a whole group
// - Error source chains: walking `source()` to find the real cause
// =============================================================================
// The header constants are typed names, so a typo is a compile error
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use super::html::{extract_page_metadata, is_html_content_type, PageMetadata};
use super::result::ProbeResult;
use crate::config::ProbeConfig;
use crate::{ConfigError, Error};

/// Probes URLs with a shared HTTP client.
///
/// Cloning is cheap (the client is reference counted), and a `Prober` keeps no
/// state between probes, so one instance can serve any number of concurrent
/// calls.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    // Applied to each request on its own, never to the probe as a whole
    timeout: Duration,
    // Most bytes read from a page body before scraping it
    max_body_bytes: usize,
}

impl Prober {
    /// Builds a prober from probe settings.
    ///
    /// Fails only when the configured headers are not valid header values or
    /// the TLS backend cannot be initialised.
    pub fn new(config: &ProbeConfig) -> Result<Self, Error> {
        // Default headers go out with every request the client sends, HEAD
        // and GET alike. Some servers answer HEAD differently when these are
        // missing, so we look like a browser asking for a page.
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value("accept", &config.accept)?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("accept-language", &config.accept_language)?,
        );

        // Builder pattern: each call returns the builder, .build() finishes.
        // No client-wide timeout here; see probe() and fetch_page_metadata().
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            timeout: config.timeout(),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Probes a single URL. Never returns an error: failures become a
    /// result with `status: None` and `error` set.
    pub async fn probe(&self, url: &str) -> ProbeResult {
        // Step 1: HEAD. Only this request is timed; the GET below is not
        // part of response_time_ms.
        let start = Instant::now();
        let head = self.client.head(url).timeout(self.timeout).send().await;
        let elapsed = start.elapsed();

        let response = match head {
            Ok(response) => response,
            Err(e) => {
                let message = describe_error(&e, self.timeout);
                debug!("HEAD {} failed after {:?}: {}", url, elapsed, message);
                return ProbeResult::failed(url, message, elapsed);
            }
        };

        // Step 2: everything the HEAD response tells us
        let status = response.status();
        debug!("HEAD {} -> {} in {:?}", url, status.as_u16(), elapsed);

        // canonical_reason() is None for codes without a standard phrase (e.g. 599)

        let mut result = ProbeResult::responded(
            url,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            elapsed,
        )
        .with_headers(collect_headers(&response));

        if let Some(final_url) = redirect_target(url, &response) {
            result = result.with_redirect(final_url);
        }

        // Step 3: only working HTML pages are worth a second request.
        // A missing or unreadable Content-Type counts as "not HTML".
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_html_content_type);

        if status.is_success() && is_html {
            if let Some(metadata) = self.fetch_page_metadata(url).await {
                result = result.with_page_metadata(metadata);
            }
        }

        result
    }

    // The GET follow-up. Returns None on any failure: the HEAD status is
    // already recorded and must not change because of this request.
    async fn fetch_page_metadata(&self, url: &str) -> Option<PageMetadata> {
        let response = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("GET {} for metadata failed: {}", url, describe_error(&e, self.timeout));
                return None;
            }
        };

        // An error page's title is not the page's title
        if !response.status().is_success() {
            debug!(
                "GET {} for metadata returned {}, skipping scrape",
                url,
                response.status().as_u16()
            );
            return None;
        }

        let body = match read_body_prefix(response, self.max_body_bytes).await {
            Ok(body) => body,
            Err(e) => {
                debug!("Reading body of {} failed: {}", url, describe_error(&e, self.timeout));
                return None;
            }
        };

        let metadata = extract_page_metadata(&body);
        if metadata.is_empty() {
            debug!("No title, description or canonical found on {}", url);
            return None;
        }
        Some(metadata)
    }
}

// Reads at most `limit` bytes of the body, chunk by chunk, then stops.
// Dropping the response afterwards closes the connection without reading
// the rest. Bytes that are not valid UTF-8 (including a character cut in
// half at the limit) become U+FFFD, which html5ever tolerates.
async fn read_body_prefix(mut response: Response, limit: usize) -> reqwest::Result<String> {
    let mut body: Vec<u8> = Vec::new();

    while let Some(chunk) = response.chunk().await? {
        let room = limit.saturating_sub(body.len());
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            debug!("Stopped reading {} after {} bytes", response.url(), limit);
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

// Maps a bad configured header to a config error naming the key
fn header_value(name: &str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|_| {
        Error::Config(ConfigError::Validation(format!(
            "probe.{} is not a valid header value",
            name
        )))
    })
}

// Header names come back lowercased from the HTTP layer. Repeated headers
// (e.g. several set-cookie lines) are joined with ", ".
fn collect_headers(response: &Response) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    headers
}

// Some(final URL) when the client followed at least one redirect.
//
// reqwest follows redirects by itself, so the only trace left is that
// response.url() differs from what we asked for. Both sides are parsed
// Urls, so "https://a.com" and "https://a.com/" compare equal.
fn redirect_target(requested: &str, response: &Response) -> Option<String> {
    let final_url = response.url();
    match Url::parse(requested) {
        Ok(requested) if &requested == final_url => None,
        Ok(_) => Some(final_url.to_string()),
        Err(_) => None,
    }
}

/// Turns a reqwest error into a short, human readable failure message.
///
/// The order of the checks matters: reqwest's own flags (timeout, redirect,
/// builder) are reliable, the text matching below them is a best guess.
fn describe_error(error: &reqwest::Error, timeout: Duration) -> String {
    // reqwest's own Display is generic ("error sending request"); the useful
    // detail lives in the source chain.
    let detail = root_cause(error);
    let lowered = detail.to_lowercase();

    if error.is_timeout() {
        format!("Request timed out after {}s", timeout.as_secs())
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_builder() {
        format!("Invalid URL: {}", detail)
    } else if lowered.contains("dns") || lowered.contains("resolve") || lowered.contains("lookup") {
        "Could not resolve hostname".to_string()
    } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl") {
        format!("SSL/TLS error: {}", detail)
    } else if error.is_connect() {
        format!("Connection failed: {}", detail)
    } else {
        detail
    }
}

// The innermost error in the chain, e.g. "Connection refused (os error 111)"
fn root_cause(error: &reqwest::Error) -> String {
    let mut source: &dyn StdError = error;
    while let Some(next) = source.source() {
        source = next;
    }
    source.to_string()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why HEAD first and GET only sometimes?
//    - HEAD returns status and headers without a body, so it is cheap
//    - Most URLs in an audit need nothing more
//    - Only 2xx HTML pages have a title worth downloading
//
// 2. What does response.chunk() give us?
//    - The next piece of the body as it arrives from the network
//    - Ok(None) means the body ended
//    - Stopping early means we never hold more than the budget in memory
//
// 3. Why does probe() return ProbeResult and not Result<ProbeResult>?
//    - A dead link is a normal answer for a link checker, not an error
//    - The batch runner never has to decide what to do with an Err
//
// 4. What is `&dyn StdError`?
//    - A reference to "some error type", chosen at runtime
//    - source() returns the error that caused this one, if any
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prober_with_defaults() {
        assert!(Prober::new(&ProbeConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_header_value_is_config_error() {
        let config = ProbeConfig {
            accept: "text/html\nX-Injected: 1".to_string(),
            ..ProbeConfig::default()
        };
        let err = Prober::new(&config).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invalid_url_becomes_failed_result() {
        let prober = Prober::new(&ProbeConfig::default()).unwrap();
        let result = prober.probe("not a url").await;
        assert!(result.status.is_none());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_refused_connection_becomes_failed_result() {
        // Bind then drop to get a local port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let prober = Prober::new(&ProbeConfig::default()).unwrap();
        let result = prober.probe(&format!("http://127.0.0.1:{}/", port)).await;

        assert!(result.status.is_none());
        assert!(result.error.is_some());
        assert!(result.response_time_ms < 10_000);
    }
}

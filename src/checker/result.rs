// src/checker/result.rs
// =============================================================================
// The outcome of probing one URL.
//
// A result is either "got a response" (status is Some, error is None) or
// "failed" (status is None, error is Some). The two constructors below are
// the only places that build a result, so that split always holds.
//
// The JSON shape is camelCase because the same struct is the wire format of
// the probe endpoint.
//
// Example (a page that redirected):
//   {"url": "http://a.com", "status": 200, "statusText": "OK",
//    "responseTimeMs": 84, "redirected": true,
//    "redirectUrl": "https://www.a.com/", "pageTitle": "A"}
//
// Rust concepts:
// - Builder-style methods that take and return `self`
// - #[serde(...)] attributes to control field names and omitted fields
// - Range patterns (200..=299) in match
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::html::PageMetadata;

/// Status label used for results that never received a response.
pub const FAILED_STATUS_TEXT: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    /// The URL that was probed
    pub url: String,
    /// HTTP status code, None when no response arrived
    pub status: Option<u16>,
    /// Reason phrase for the status ("Not Found"), or "Error"
    pub status_text: String,
    /// Wall-clock time of the HEAD request only
    pub response_time_ms: u64,
    /// True when the final response came from a different URL
    pub redirected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which bucket a result falls in for summaries and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// 3xx
    Redirect,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// No response at all
    Failed,
    /// A response code outside 200..600
    Other,
}

impl StatusClass {
    /// Every class, in display order
    pub const ALL: [StatusClass; 6] = [
        StatusClass::Success,
        StatusClass::Redirect,
        StatusClass::ClientError,
        StatusClass::ServerError,
        StatusClass::Failed,
        StatusClass::Other,
    ];

    /// Human readable bucket name, used in summaries
    pub fn label(&self) -> &'static str {
        match self {
            StatusClass::Success => "Success",
            StatusClass::Redirect => "Redirect",
            StatusClass::ClientError => "Client Error",
            StatusClass::ServerError => "Server Error",
            StatusClass::Failed => "Failed",
            StatusClass::Other => "Other",
        }
    }
}

// as_millis() is u128; anything that large is clamped rather than wrapped
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl ProbeResult {
    /// A probe that received a response.
    pub fn responded(
        url: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            status_text: status_text.into(),
            response_time_ms: elapsed_ms(elapsed),
            redirected: false,
            redirect_url: None,
            headers: Some(BTreeMap::new()),
            page_title: None,
            meta_description: None,
            canonical: None,
            error: None,
        }
    }

    /// A probe that failed before any response arrived.
    pub fn failed(url: impl Into<String>, error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            url: url.into(),
            status: None,
            status_text: FAILED_STATUS_TEXT.to_string(),
            response_time_ms: elapsed_ms(elapsed),
            redirected: false,
            redirect_url: None,
            headers: None,
            page_title: None,
            meta_description: None,
            canonical: None,
            error: Some(error.into()),
        }
    }

    /// Records that the response came from `final_url`.
    pub fn with_redirect(mut self, final_url: impl Into<String>) -> Self {
        self.redirected = true;
        self.redirect_url = Some(final_url.into());
        self
    }

    /// Sets response headers. Ignored for failed results, which have none.
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        if self.status.is_some() {
            self.headers = Some(headers);
        }
        self
    }

    /// Attaches scraped page fields. Ignored unless the status is 2xx.
    pub fn with_page_metadata(mut self, metadata: PageMetadata) -> Self {
        if self.class() == StatusClass::Success {
            self.page_title = metadata.title;
            self.meta_description = metadata.meta_description;
            self.canonical = metadata.canonical;
        }
        self
    }

    pub fn class(&self) -> StatusClass {
        match self.status {
            None => StatusClass::Failed,
            Some(200..=299) => StatusClass::Success,
            Some(300..=399) => StatusClass::Redirect,
            Some(400..=499) => StatusClass::ClientError,
            Some(500..=599) => StatusClass::ServerError,
            Some(_) => StatusClass::Other,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status.is_none()
    }

    /// True for 2xx and 3xx responses
    pub fn is_ok(&self) -> bool {
        matches!(self.status, Some(200..=399))
    }

    /// The URL a working link actually lands on.
    pub fn effective_url(&self) -> &str {
        self.redirect_url.as_deref().unwrap_or(&self.url)
    }

    /// Hostname of the probed URL, None if it does not parse.
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<u16> for status instead of 0 for "no response"?
//    - 0 is a number a bug could produce; None cannot be mistaken for a code
//    - serde writes None as null, which is what JSON clients check for
//
// 2. What does skip_serializing_if = "Option::is_none" do?
//    - It leaves the key out of the JSON when the value is None
//    - #[serde(default)] lets the key be missing again when reading it back
// -----------------------------------------------------------------------------

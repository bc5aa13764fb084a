// src/checker/remote.rs
// =============================================================================
// Probes URLs through a running probe endpoint (see src/server) instead of
// from this process. This is how a client-side batch talks to a deployed
// checker: one POST {"url": ...} per URL, one ProbeResult back.
//
// Anything that goes wrong with the endpoint itself (unreachable, non-200,
// unparseable body, a body that breaks the result rules) is folded into a
// failed ProbeResult, same as a network failure on a direct probe.
//
// What counts as a usable answer:
// - HTTP 200 with a JSON ProbeResult
// - its `url` is the URL we asked about
// - exactly one of `status` / `error` is set
//
// Rust concepts:
// - Result<T, String> for a check whose only output is a reason
// - serde: the same ProbeResult type is decoded here and encoded by the server
// =============================================================================

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use super::result::ProbeResult;
use crate::config::ProbeConfig;
use crate::{ConfigError, Error};

/// Path of the single-URL probe route, relative to the endpoint base URL.
pub const CHECK_URL_PATH: &str = "/api/check-url";

// The endpoint may spend one timeout on HEAD and another on GET.
const ENDPOINT_SLACK: Duration = Duration::from_secs(5);

// Body of a non-200 answer, e.g. {"error": "Invalid URL provided"}
#[derive(Debug, Deserialize)]
struct EndpointError {
    error: String,
}

/// Sends probes to a remote endpoint.
#[derive(Debug, Clone)]
pub struct RemoteProber {
    client: Client,
    // Full URL of the check route, already joined with CHECK_URL_PATH
    endpoint: Url,
    // Covers the whole remote probe, not one request
    timeout: Duration,
}

impl RemoteProber {
    /// `base_url` is where the server listens, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str, config: &ProbeConfig) -> Result<Self, Error> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(CHECK_URL_PATH))
            .map_err(|e| {
                Error::Config(ConfigError::Validation(format!(
                    "invalid endpoint URL '{}': {}",
                    base_url, e
                )))
            })?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            endpoint,
            timeout: config.timeout() * 2 + ENDPOINT_SLACK,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Asks the endpoint to probe `url`. Like the direct prober, this never
    /// returns an error; endpoint trouble becomes a failed result.
    pub async fn probe(&self, url: &str) -> ProbeResult {
        // Elapsed time is only used for failures we create ourselves; a
        // good answer carries the endpoint's own HEAD timing.
        let start = Instant::now();
        let sent = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&json!({ "url": url }))
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                debug!("Endpoint call for {} failed: {}", url, e);
                return ProbeResult::failed(
                    url,
                    format!("Probe endpoint unreachable: {}", e),
                    start.elapsed(),
                );
            }
        };

        let status = response.status();
        if status == StatusCode::OK {
            let checked = response
                .json::<ProbeResult>()
                .await
                .map_err(|e| e.to_string())
                .and_then(|result| check_endpoint_result(url, result));

            return match checked {
                Ok(result) => result,
                Err(reason) => {
                    debug!("Endpoint answer for {} rejected: {}", url, reason);
                    ProbeResult::failed(
                        url,
                        format!("Invalid response from probe endpoint: {}", reason),
                        start.elapsed(),
                    )
                }
            };
        }

        // Not a 200: the endpoint refused the request (400) or broke (5xx).
        // Prefer its {"error": ...} message, fall back to the reason phrase.

        let message = match response.json::<EndpointError>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };
        ProbeResult::failed(
            url,
            format!("Probe endpoint returned {}: {}", status.as_u16(), message),
            start.elapsed(),
        )
    }
}

// Accepts an endpoint answer only if it is about `url` and is either a
// response (status set) or a failure (error set), never both or neither.
fn check_endpoint_result(url: &str, result: ProbeResult) -> Result<ProbeResult, String> {
    if result.url != url {
        return Err(format!("answered for {} instead", result.url));
    }

    match (result.status.is_some(), result.error.is_some()) {
        (true, false) | (false, true) => Ok(result),
        (true, true) => Err("both status and error are set".to_string()),
        (false, false) => Err("neither status nor error is set".to_string()),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why check a result we decoded successfully?
//    - serde only checks the shape: field names and types
//    - It cannot know that status and error exclude each other
//    - Downstream code (buckets, CSV, exit code) relies on that rule
//
// 2. What does .and_then() do on a Result?
//    - If the Result is Ok, it runs the next step with the value
//    - If it is Err, the error passes through untouched
//    - Here: decode, then check, with one error type (String) for both
// -----------------------------------------------------------------------------

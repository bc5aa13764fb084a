// src/checker/mod.rs
// =============================================================================
// This module contains everything about checking a single URL.
//
// Submodules:
// - probe: HEAD + optional GET against the target site
// - remote: the same contract, delegated to a running probe endpoint
// - html: title / meta description / canonical extraction
// - result: the ProbeResult record and its status classes
//
// The Probe trait is the seam the batch orchestrator is generic over, so it
// can drive either prober (and test doubles in tests).
// =============================================================================

mod html;
mod probe;
mod remote;
mod result;

use std::future::Future;

pub use html::{extract_page_metadata, is_html_content_type, PageMetadata};
pub use probe::Prober;
pub use remote::{RemoteProber, CHECK_URL_PATH};
pub use result::{ProbeResult, StatusClass, FAILED_STATUS_TEXT};

/// Anything that can turn a URL into a ProbeResult.
///
/// Implementations must not fail: every problem is reported inside the
/// returned result.
pub trait Probe: Send + Sync {
    fn probe(&self, url: &str) -> impl Future<Output = ProbeResult> + Send;
}

impl Probe for Prober {
    fn probe(&self, url: &str) -> impl Future<Output = ProbeResult> + Send {
        Prober::probe(self, url)
    }
}

impl Probe for RemoteProber {
    fn probe(&self, url: &str) -> impl Future<Output = ProbeResult> + Send {
        RemoteProber::probe(self, url)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is `impl Future<Output = ProbeResult> + Send` in a trait?
//    - It says "probe returns some future", without naming its exact type
//    - The + Send lets the future move between tokio worker threads
//
// 2. Why a trait at all?
//    - batch::run only needs "give me a result for this URL"
//    - Prober and RemoteProber both provide that, and tests can too
// -----------------------------------------------------------------------------

// src/config/types.rs
// =============================================================================
// Plain data types for configuration, deserialized from TOML with serde.
// =============================================================================

use serde::Deserialize;
use std::time::Duration;

/// Identifies the prober to the sites it checks.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "link-prober/",
    env!("CARGO_PKG_VERSION"),
    " (+SEO status checker)"
);

/// Browser-like accept header so servers answer HEAD the way they answer pages.
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Bytes of a page read for metadata. Title, description and canonical live
/// in the head, which fits comfortably in this.
pub const DEFAULT_MAX_BODY_BYTES: usize = 512 * 1024;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub probe: ProbeConfig,
    pub batch: BatchConfig,
    pub server: ServerConfig,
}

/// Settings for a single URL probe
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProbeConfig {
    /// Upper bound for each request (HEAD and GET are bounded separately)
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Accept header sent with every request
    pub accept: String,

    /// Accept-Language header sent with every request
    pub accept_language: String,

    /// How many redirects to follow before giving up
    pub max_redirects: usize,

    /// Most bytes of a page body read when scraping metadata; the rest is
    /// left unread
    pub max_body_bytes: usize,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            max_redirects: 10,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Settings for the batch orchestrator
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BatchConfig {
    /// Number of URLs probed concurrently per group
    pub group_size: usize,

    /// Pause between two groups (milliseconds)
    pub pause_ms: u64,
}

impl BatchConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            group_size: 10,
            pause_ms: 300,
        }
    }
}

/// Settings for the probe endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the endpoint listens on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

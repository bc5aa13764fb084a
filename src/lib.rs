// src/lib.rs
// =============================================================================
// link-prober library: everything except argument parsing and terminal output.
//
// Data flows one way through these modules:
//   raw text -> input::normalize -> batch::run (checker::Prober per URL)
//            -> batch::classify / export
//
// The server module exposes the single-URL probe over HTTP so a remote
// orchestrator (checker::RemoteProber) can drive it.
// =============================================================================

pub mod batch;
pub mod checker;
pub mod config;
pub mod export;
pub mod input;
pub mod server;

use thiserror::Error;

/// Main error type for link-prober operations.
///
/// Per-URL network failures are NOT represented here: they are data inside
/// a `ProbeResult`. These variants cover setup, validation and output problems.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No valid URLs provided")]
    NoValidUrls,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for link-prober operations
pub type Result<T> = std::result::Result<T, Error>;

// Re-export the types most callers need
pub use batch::{run, BatchReport, BatchRun, Progress};
pub use checker::{Probe, ProbeResult, Prober, RemoteProber};
pub use config::Config;
pub use input::normalize;

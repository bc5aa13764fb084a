// src/config/parser.rs
// =============================================================================
// Loading and validating configuration files.
// =============================================================================

use crate::config::types::Config;
use crate::ConfigError;
use std::net::SocketAddr;
use std::path::Path;

/// Upper bound for `max-redirects`; anything above is almost certainly a typo.
const MAX_REDIRECT_LIMIT: usize = 50;

/// Loads, parses and validates a TOML configuration file.
///
/// Missing sections and keys fall back to their defaults.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use link_prober::config::load_config;
///
/// let config = load_config(Path::new("prober.toml")).unwrap();
/// println!("Group size: {}", config.batch.group_size);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Checks value ranges that serde cannot express.
///
/// Called by `load_config`, and again by the CLI after flags are applied.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.probe.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "probe.timeout-secs must be greater than 0".to_string(),
        ));
    }

    if config.probe.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "probe.user-agent must not be empty".to_string(),
        ));
    }

    if config.probe.max_redirects > MAX_REDIRECT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "probe.max-redirects must be at most {}",
            MAX_REDIRECT_LIMIT
        )));
    }

    if config.probe.max_body_bytes == 0 {
        return Err(ConfigError::Validation(
            "probe.max-body-bytes must be greater than 0".to_string(),
        ));
    }

    if config.batch.group_size == 0 {
        return Err(ConfigError::Validation(
            "batch.group-size must be greater than 0".to_string(),
        ));
    }

    if config.server.bind.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::Validation(format!(
            "server.bind is not a valid socket address: {}",
            config.server.bind
        )));
    }

    Ok(())
}

// src/config/mod.rs
// =============================================================================
// Configuration for probing, batching and the HTTP endpoint.
//
// Every field has a default, so a config file is optional. When one is given
// it is TOML, for example:
//
//   [probe]
//   timeout-secs = 5
//   user-agent = "my-audit-bot/1.0"
//   max-body-bytes = 262144
//
//   [batch]
//   group-size = 20
//   pause-ms = 500
//
//   [server]
//   bind = "0.0.0.0:8080"
//
// The CLI applies its flags on top of whatever was loaded here.
// =============================================================================

mod parser;
mod types;

pub use parser::{load_config, validate};
pub use types::{
    BatchConfig, Config, ProbeConfig, ServerConfig, DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE,
    DEFAULT_MAX_BODY_BYTES, DEFAULT_USER_AGENT,
};

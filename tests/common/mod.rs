//! Shared helpers for integration tests

#![allow(dead_code)]

use link_prober::config::{BatchConfig, ProbeConfig};

/// Probe settings with a short timeout so failure tests finish quickly
pub fn probe_config(timeout_secs: u64) -> ProbeConfig {
    ProbeConfig {
        timeout_secs,
        ..ProbeConfig::default()
    }
}

pub fn batch_config(group_size: usize) -> BatchConfig {
    BatchConfig {
        group_size,
        pause_ms: 0,
    }
}

/// A local URL nothing listens on (bind, read the port, drop)
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

pub fn html_page(title: &str, description: &str, canonical: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>{}</title>
  <meta content="{}" name="description">
  <link rel="canonical" href="{}">
</head>
<body><h1>Hello</h1></body>
</html>"#,
        title, description, canonical
    )
}

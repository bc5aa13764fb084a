// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - check: probe a batch of URLs and print / export the results
// - serve: run the single-URL probe endpoint over HTTP
//
// Flags given here override values from the optional --config file.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-prober",
    version,
    about = "Batch HTTP status checker for SEO audits",
    long_about = "link-prober checks a list of URLs and reports status code, response time, \
                  redirect target and, for HTML pages, title, meta description and canonical link."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe a list of URLs
    ///
    /// Example: link-prober check example.com rust-lang.org --csv report.csv
    Check {
        /// URLs to check (commas or separate arguments)
        urls: Vec<String>,

        /// Read URLs from a file, or from stdin with "-"
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Path to a TOML configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// URLs probed concurrently per group
        #[arg(long, value_name = "N")]
        group_size: Option<usize>,

        /// Pause between groups in milliseconds
        #[arg(long, value_name = "MS")]
        pause_ms: Option<u64>,

        /// Probe through a running `link-prober serve` endpoint instead of directly
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Write all results to a CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Write working URLs (2xx/3xx) to a plain text file
        #[arg(long, value_name = "PATH")]
        txt: Option<PathBuf>,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Group the table by hostname
        #[arg(long)]
        by_host: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Serve the probe endpoint (POST /api/check-url)
    ///
    /// Example: link-prober serve --bind 0.0.0.0:8080
    Serve {
        /// Path to a TOML configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Address to listen on
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
}

// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr) based on -v / -q
// 3. Dispatch to the check or serve handler
// 4. Exit with proper code (0 = all links fine, 1 = problems found, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use link_prober::batch::{group_by_host, summarize, Summary};
use link_prober::checker::{Probe, ProbeResult, StatusClass};
use link_prober::config::{load_config, validate, Config};
use link_prober::{export, input, run, BatchReport, Prober, RemoteProber};

#[tokio::main]
async fn main() {
    let exit_code = match run_cli().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run_cli() -> Result<i32> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Check {
            urls,
            file,
            config,
            timeout,
            group_size,
            pause_ms,
            endpoint,
            csv,
            txt,
            json,
            by_host,
            no_progress,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            if let Some(timeout) = timeout {
                settings.probe.timeout_secs = timeout;
            }
            if let Some(group_size) = group_size {
                settings.batch.group_size = group_size;
            }
            if let Some(pause_ms) = pause_ms {
                settings.batch.pause_ms = pause_ms;
            }
            validate(&settings)?;

            let options = CheckOptions {
                endpoint,
                csv,
                txt,
                json,
                by_host,
                show_progress: !(no_progress || json || cli.quiet),
            };
            handle_check(urls, file, settings, options).await
        }
        Commands::Serve {
            config,
            bind,
            timeout,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            if let Some(bind) = bind {
                settings.server.bind = bind;
            }
            if let Some(timeout) = timeout {
                settings.probe.timeout_secs = timeout;
            }
            validate(&settings)?;
            handle_serve(settings).await
        }
    }
}

/// Sets up the tracing subscriber. RUST_LOG wins over the flags when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("link_prober=warn,warn"),
                1 => EnvFilter::new("link_prober=info,warn"),
                2 => EnvFilter::new("link_prober=debug,info"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

struct CheckOptions {
    endpoint: Option<String>,
    csv: Option<PathBuf>,
    txt: Option<PathBuf>,
    json: bool,
    by_host: bool,
    show_progress: bool,
}

// Handles the 'check' subcommand
async fn handle_check(
    urls: Vec<String>,
    file: Option<PathBuf>,
    settings: Config,
    options: CheckOptions,
) -> Result<i32> {
    let text = read_input(urls, file.as_deref()).await?;
    let targets = input::normalize(&text);

    // Nothing valid to probe is a user error, reported before any request
    if targets.is_empty() {
        return Err(link_prober::Error::NoValidUrls.into());
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling: finishing the current group...");
            ctrl_c.cancel();
        }
    });

    let report = match &options.endpoint {
        Some(endpoint) => {
            let prober = RemoteProber::new(endpoint, &settings.probe)?;
            tracing::info!("Probing through {}", prober.endpoint());
            execute(&prober, &targets, &settings, &cancel, options.show_progress).await
        }
        None => {
            let prober = Prober::new(&settings.probe)?;
            execute(&prober, &targets, &settings, &cancel, options.show_progress).await
        }
    };

    if let Some(path) = &options.csv {
        export::write_csv_file(&report.results, path)
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
    }
    if let Some(path) = &options.txt {
        export::write_plain_text_file(&report.results, path)
            .with_context(|| format!("Failed to write URL list to {}", path.display()))?;
    }

    let summary = summarize(&report.results);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report.results)?);
    } else {
        if options.by_host {
            print_grouped_table(&report.results);
        } else {
            print_table(&report.results);
        }
        print_summary(&summary);
        if report.cancelled {
            println!(
                "⏹️  Cancelled after {} of {} URL(s)",
                report.progress.completed, report.progress.total
            );
        }
    }

    if summary.problems() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Runs the batch with a progress bar attached.
async fn execute<P: Probe>(
    prober: &P,
    targets: &[String],
    settings: &Config,
    cancel: &CancellationToken,
    show_progress: bool,
) -> BatchReport {
    let bar = if show_progress {
        let bar = ProgressBar::new(targets.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} URLs {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let report = run(prober, targets, &settings.batch, cancel, |progress| {
        bar.set_position(progress.completed as u64);
    })
    .await;

    bar.finish_and_clear();
    report
}

// Concatenates positional URLs with the file (or stdin) contents.
async fn read_input(urls: Vec<String>, file: Option<&Path>) -> Result<String> {
    let mut text = urls.join("\n");

    if let Some(path) = file {
        let content = if path.as_os_str() == "-" {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read URLs from stdin")?;
            buffer
        } else {
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read URLs from {}", path.display()))?
        };
        text.push('\n');
        text.push_str(&content);
    }

    if text.trim().is_empty() {
        anyhow::bail!("No input: pass URLs as arguments or use --file");
    }
    Ok(text)
}

// Handles the 'serve' subcommand
async fn handle_serve(settings: Config) -> Result<i32> {
    let prober = Prober::new(&settings.probe)?;

    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    println!("🌐 Probe endpoint on http://{}/api/check-url", settings.server.bind);
    link_prober::server::bind_and_serve(&settings.server.bind, prober, shutdown).await?;
    Ok(0)
}

// Prints results as a human-readable table in the terminal
fn print_table(results: &[ProbeResult]) {
    print_header();
    for result in results {
        print_row(result);
    }
    println!();
}

fn print_grouped_table(results: &[ProbeResult]) {
    for (host, group) in group_by_host(results) {
        println!("🏷️  {} ({})", host, group.len());
        print_header();
        for result in group {
            print_row(result);
        }
        println!();
    }
}

fn print_header() {
    println!("{:<60} {:<18} {:>8}  {}", "URL", "STATUS", "TIME", "DETAIL");
    println!("{}", "=".repeat(110));
}

fn print_row(result: &ProbeResult) {
    // Truncate URL if too long for display
    let url_display = if result.url.chars().count() > 57 {
        format!("{}...", result.url.chars().take(57).collect::<String>())
    } else {
        result.url.clone()
    };

    println!(
        "{:<60} {:<18} {:>6}ms  {}",
        url_display,
        format_status(result),
        result.response_time_ms,
        detail(result)
    );
}

fn class_icon(class: StatusClass) -> &'static str {
    match class {
        StatusClass::Success => "✅",
        StatusClass::Redirect => "🔀",
        StatusClass::ClientError => "❌",
        StatusClass::ServerError => "💥",
        StatusClass::Failed => "⚠️ ",
        StatusClass::Other => "❓",
    }
}

fn format_status(result: &ProbeResult) -> String {
    match result.status {
        Some(code) => format!("{} {}", class_icon(result.class()), code),
        None => format!("{} FAILED", class_icon(StatusClass::Failed)),
    }
}

fn detail(result: &ProbeResult) -> String {
    if let Some(error) = &result.error {
        return error.clone();
    }
    if let Some(target) = &result.redirect_url {
        return format!("-> {}", target);
    }
    result
        .page_title
        .clone()
        .unwrap_or_else(|| result.status_text.clone())
}

fn print_summary(summary: &Summary) {
    println!("📊 Summary:");
    for (class, count) in summary.counts() {
        // Codes outside 200..600 are rare; only mention them when present
        if class == StatusClass::Other && count == 0 {
            continue;
        }
        println!("   {} {}: {}", class_icon(class), class.label(), count);
    }
    println!("   📋 Total: {}", summary.total);
    if let Some(average) = summary.average_response_ms {
        println!("   ⏱️  Average response: {}ms", average);
    }
}

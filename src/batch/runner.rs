// src/batch/runner.rs
// =============================================================================
// The batch orchestrator.
//
// How a run proceeds:
// 1. Split the URL list into groups of `group_size`, keeping order
// 2. For each group: start every probe at once and wait for all of them
// 3. Append the group's results in input order, report progress
// 4. Sleep `pause` before the next group (not after the last one)
// 5. Stop starting new groups once the cancellation token fires
//
// Probes within a group overlap on the network but results are collected by
// position (join_all), so output[i] always belongs to input[i].
//
// Cancellation never aborts a group that already started: every probe that
// began produces a result. A cancel during the inter-group pause takes
// effect immediately.
// =============================================================================

use futures::future::join_all;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::checker::{Probe, ProbeResult};
use crate::config::BatchConfig;

/// How far a run has got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// The mutable state of one run. Only the orchestrator writes to it, and
/// only after a group barrier.
#[derive(Debug)]
pub struct BatchRun {
    results: Vec<ProbeResult>,
    progress: Progress,
}

impl BatchRun {
    pub fn new(total: usize) -> Self {
        Self {
            results: Vec::with_capacity(total),
            progress: Progress { completed: 0, total },
        }
    }

    /// Appends one finished group and returns the updated progress.
    pub fn record_group(&mut self, group: Vec<ProbeResult>) -> Progress {
        self.progress.completed += group.len();
        self.results.extend(group);
        self.progress
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Freezes the run into its final report.
    pub fn finish(self) -> BatchReport {
        BatchReport {
            cancelled: !self.progress.is_complete(),
            progress: self.progress,
            results: self.results,
        }
    }
}

/// Immutable outcome of one run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Results in input order; shorter than the input only when cancelled
    pub results: Vec<ProbeResult>,
    pub progress: Progress,
    /// True when groups were skipped because of cancellation
    pub cancelled: bool,
}

/// Probes `urls` group by group.
///
/// `on_progress` is called once per finished group. When `cancel` fires,
/// the group in flight completes and no further group starts; the results
/// gathered so far are returned.
///
/// # Example
///
/// ```no_run
/// use link_prober::config::Config;
/// use link_prober::{normalize, run, Prober};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), link_prober::Error> {
/// let config = Config::default();
/// let prober = Prober::new(&config.probe)?;
/// let urls = normalize("example.com\nrust-lang.org");
///
/// let report = run(&prober, &urls, &config.batch, &CancellationToken::new(), |progress| {
///     println!("{} probed", progress);
/// })
/// .await;
/// println!("{} results", report.results.len());
/// # Ok(())
/// # }
/// ```
pub async fn run<P, F>(
    prober: &P,
    urls: &[String],
    config: &BatchConfig,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> BatchReport
where
    P: Probe,
    F: FnMut(Progress),
{
    let group_size = config.group_size.max(1);
    let group_count = urls.len().div_ceil(group_size);
    let pause = config.pause();
    let mut state = BatchRun::new(urls.len());

    info!(
        "Probing {} URL(s) in {} group(s) of up to {}",
        urls.len(),
        group_count,
        group_size
    );

    for (index, group) in urls.chunks(group_size).enumerate() {
        if cancel.is_cancelled() {
            info!(
                "Run cancelled after {} of {} URL(s)",
                state.progress().completed,
                urls.len()
            );
            break;
        }

        debug!("Starting group {}/{} ({} URL(s))", index + 1, group_count, group.len());
        let results = join_all(group.iter().map(|url| prober.probe(url))).await;
        let progress = state.record_group(results);
        on_progress(progress);

        let is_last = index + 1 == group_count;
        if !is_last && !pause.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }

    state.finish()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why join_all and not buffer_unordered?
//    - buffer_unordered yields results as they finish, so order is lost
//    - join_all waits for every future and returns results by position
//    - That positional output is what keeps output[i] matched to input[i]
//
// 2. What does tokio::select! do here?
//    - It waits on two futures and continues with whichever finishes first
//    - Either the pause elapses or the token is cancelled
//
// 3. Why is the closure FnMut?
//    - The progress callback may update its own state (a counter, a bar)
//    - FnMut allows that; Fn would not
// -----------------------------------------------------------------------------

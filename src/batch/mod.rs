// src/batch/mod.rs
// =============================================================================
// Runs many probes: fixed-size groups, one group at a time, with a pause in
// between, then classifies what came back.
//
// Submodules:
// - runner: the orchestrator and its run context
// - classify: buckets, per-host grouping and summary counts over results
// =============================================================================

mod classify;
mod runner;

pub use classify::{buckets, by_class, group_by_host, summarize, Summary, UNKNOWN_HOST};
pub use runner::{run, BatchReport, BatchRun, Progress};

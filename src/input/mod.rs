// src/input/mod.rs
// =============================================================================
// Turns pasted or uploaded text into the list of URLs a batch will probe.
// =============================================================================

mod normalize;

pub use normalize::{candidates, normalize, UrlCandidate};

// Affinity: brand affinity scoring for social accounts.
//
// This is the library root. Each module corresponds to a major stage of
// the scoring pipeline: reading collected snapshots, network (follower
// overlap) scoring, text (discriminative bigram) scoring, and validation
// diagnostics.

pub mod config;
pub mod diagnose;
pub mod io;
pub mod network;
pub mod output;
pub mod stats;
pub mod text;

use std::collections::{BTreeMap, HashSet};

/// Set of follower ids for one account.
pub type FollowerSet = HashSet<u64>;

/// Exemplar accounts and their followers. A BTreeMap so that iteration,
/// sampling, and output order are deterministic for a given input.
pub type ExemplarPool = BTreeMap<String, FollowerSet>;

/// Final output of every scoring stage: handle -> score, sorted by handle.
pub type ScoreMap = BTreeMap<String, f64>;

// Run configuration.
//
// The whole configuration surface is CLI flags; these structs are built
// directly from the parsed arguments. Validation happens up front, before
// any data is loaded, so a bad flag combination fails in milliseconds
// instead of after a long pool load.

use std::path::PathBuf;

use anyhow::{ensure, Result};

use crate::network::NetworkMethod;
use crate::text::TextMethod;

/// Default RNG seed for exemplar sampling.
pub const DEFAULT_SEED: u64 = 12345;

/// Default upper bound on exemplar follower counts (effectively "no cap"
/// for real data, but finite so the window stays printable).
pub const DEFAULT_MAX_FOLLOWERS: usize = 10_000_000_000;

/// Options for a network (follower-overlap) scoring run.
pub struct NetworkOptions {
    pub brand_followers: PathBuf,
    pub exemplar_followers: PathBuf,
    pub output: PathBuf,
    pub method: NetworkMethod,
    /// Exemplars must have strictly more followers than this.
    pub min_followers: usize,
    /// ...and at most this many.
    pub max_followers: usize,
    /// Percentage of the filtered pool to keep, sampled uniformly without
    /// replacement. 100 disables sampling.
    pub sample_exemplars: f64,
    pub seed: u64,
}

impl NetworkOptions {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_followers > self.min_followers,
            "follower window is empty: min_followers={} >= max_followers={}",
            self.min_followers,
            self.max_followers
        );
        ensure!(
            self.sample_exemplars > 0.0 && self.sample_exemplars <= 100.0,
            "sample_exemplars must be in (0, 100], got {}",
            self.sample_exemplars
        );
        Ok(())
    }
}

/// Options for a text (discriminative bigram) scoring run.
pub struct TextOptions {
    pub brand_tweets: PathBuf,
    pub exemplar_tweets: PathBuf,
    pub sample_tweets: PathBuf,
    pub output: PathBuf,
    pub method: TextMethod,
    /// How many discriminative terms to keep.
    pub top_terms: usize,
    /// A bigram must appear in at least this many exemplar documents.
    pub min_df: usize,
}

impl TextOptions {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.top_terms > 0, "top_terms must be positive");
        ensure!(self.min_df > 0, "min_df must be positive");
        Ok(())
    }
}

/// Options for a diagnostic run against validation ground truth.
pub struct DiagnoseOptions {
    pub brand_followers: PathBuf,
    pub exemplar_followers: PathBuf,
    pub validation: PathBuf,
    pub output: PathBuf,
    pub method: NetworkMethod,
}

// Rarity weighting.
//
// A follower shared by many exemplars is generically interested in the
// category and carries little information; a follower concentrated on one
// or two exemplars is a strong signal. Each exemplar contributes
// 1/|its followers| (or a log-damped variant) to every follower it has,
// and a brand's score is the mean contribution over its own followers.

use std::collections::HashMap;

use anyhow::{bail, ensure, Result};

use crate::{ExemplarPool, FollowerSet};

/// Per-follower informativeness weights: each exemplar E adds
/// `1/|followers(E)|` to every follower of E.
pub fn rarity_weights(pool: &ExemplarPool) -> HashMap<u64, f64> {
    let mut weights = HashMap::new();
    for followers in pool.values() {
        let contribution = 1.0 / followers.len() as f64;
        for &f in followers {
            *weights.entry(f).or_insert(0.0) += contribution;
        }
    }
    weights
}

/// Log-damped variant: each exemplar E adds `1/ln(1 + |followers(E)|)`.
/// The +1 keeps the contribution finite for degree-1 exemplars.
pub fn rarity_weights_log(pool: &ExemplarPool) -> HashMap<u64, f64> {
    let mut weights = HashMap::new();
    for followers in pool.values() {
        let contribution = 1.0 / (1.0 + followers.len() as f64).ln();
        for &f in followers {
            *weights.entry(f).or_insert(0.0) += contribution;
        }
    }
    weights
}

/// Mean rarity weight over a brand's followers. Followers absent from the
/// weight table contribute zero — they follow no exemplar at all, which
/// is informative, not an error.
pub fn rarity_score(followers: &FollowerSet, weights: &HashMap<u64, f64>) -> Result<f64> {
    ensure!(!weights.is_empty(), "rarity weight table is empty");
    if followers.is_empty() {
        bail!("rarity score undefined for an empty brand follower set");
    }
    let total: f64 = followers
        .iter()
        .map(|f| weights.get(f).copied().unwrap_or(0.0))
        .sum();
    Ok(total / followers.len() as f64)
}

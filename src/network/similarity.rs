// Set-similarity between a brand's follower set and an exemplar pool.
//
// Three pairwise similarities (Jaccard, containment/proportion, cosine),
// each aggregated over the pool as an unweighted mean, an
// inverse-size-weighted mean, or a single comparison against the union of
// all exemplar followers ("merge"). An optional square root compresses
// the final aggregate.

use anyhow::{bail, ensure, Result};

use crate::{ExemplarPool, FollowerSet};

/// Pairwise similarity measure between two follower sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairwise {
    Jaccard,
    /// `|a∩b| / |a|` — asymmetric; the denominator is the brand's own
    /// follower count.
    Proportion,
    Cosine,
}

/// How pairwise similarities are combined across the exemplar pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Arithmetic mean over all exemplars.
    Mean,
    /// Mean weighted by `1/|exemplar_followers|` — popular exemplars are
    /// less discriminative and count less.
    WeightedMean,
    /// Union all exemplar follower sets into one pseudo-account and take
    /// a single pairwise similarity. Measures overlap with the exemplar
    /// population as a whole, not an average over individuals.
    Merge,
}

fn intersection_size(a: &FollowerSet, b: &FollowerSet) -> usize {
    // Iterate the smaller set.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|id| large.contains(id)).count()
}

/// Jaccard similarity `|a∩b| / |a∪b|`.
pub fn jaccard(a: &FollowerSet, b: &FollowerSet) -> f64 {
    let inter = intersection_size(a, b);
    let union = a.len() + b.len() - inter;
    inter as f64 / union as f64
}

/// Containment `|a∩b| / |a|`. Asymmetric by design.
pub fn proportion(a: &FollowerSet, b: &FollowerSet) -> f64 {
    intersection_size(a, b) as f64 / a.len() as f64
}

/// Cosine similarity over binary sets: `|a∩b| / (sqrt(|a|)·sqrt(|b|))`.
pub fn cosine(a: &FollowerSet, b: &FollowerSet) -> f64 {
    intersection_size(a, b) as f64 / ((a.len() as f64).sqrt() * (b.len() as f64).sqrt())
}

fn pairwise_fn(measure: Pairwise) -> fn(&FollowerSet, &FollowerSet) -> f64 {
    match measure {
        Pairwise::Jaccard => jaccard,
        Pairwise::Proportion => proportion,
        Pairwise::Cosine => cosine,
    }
}

/// Score one brand follower set against the exemplar pool.
///
/// An empty pool is a configuration error. An empty brand follower set
/// makes every measure undefined (division by zero) and is a reportable
/// error, never a silent zero.
pub fn score_set(
    followers: &FollowerSet,
    pool: &ExemplarPool,
    measure: Pairwise,
    aggregation: Aggregation,
    sqrt: bool,
) -> Result<f64> {
    ensure!(!pool.is_empty(), "exemplar pool is empty");
    if followers.is_empty() {
        bail!("similarity undefined for an empty brand follower set");
    }

    let sim = pairwise_fn(measure);
    let score = match aggregation {
        Aggregation::Mean => {
            pool.values().map(|e| sim(followers, e)).sum::<f64>() / pool.len() as f64
        }
        Aggregation::WeightedMean => {
            let mut total = 0.0;
            let mut weight_sum = 0.0;
            for exemplar in pool.values() {
                let w = 1.0 / exemplar.len() as f64;
                total += w * sim(followers, exemplar);
                weight_sum += w;
            }
            total / weight_sum
        }
        Aggregation::Merge => {
            let union = merge_pool(pool);
            sim(followers, &union)
        }
    };

    Ok(if sqrt { score.sqrt() } else { score })
}

/// Union of all exemplar follower sets: the "merged" pseudo-account.
pub fn merge_pool(pool: &ExemplarPool) -> FollowerSet {
    let mut union = FollowerSet::new();
    for followers in pool.values() {
        union.extend(followers);
    }
    union
}

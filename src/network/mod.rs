// Network scoring — follower-overlap affinity.
//
// One pass: load the filtered exemplar pool, optionally sample it, then
// stream brands one at a time through the selected similarity method and
// write one score per brand, sorted by handle.

pub mod rarity;
pub mod similarity;

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::NetworkOptions;
use crate::io::followers::{read_follower_file, read_handles, FollowerStream};
use crate::output::ScoreWriter;
use crate::{ExemplarPool, FollowerSet, ScoreMap};

use similarity::{Aggregation, Pairwise};

/// The closed set of network scoring methods. Unknown names fail at CLI
/// parse time, before any data is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NetworkMethod {
    Jaccard,
    JaccardWeighted,
    JaccardSqrt,
    JaccardWeightedSqrt,
    JaccardMerge,
    Proportion,
    ProportionWeighted,
    ProportionSqrt,
    ProportionWeightedSqrt,
    ProportionMerge,
    Cosine,
    CosineWeighted,
    CosineSqrt,
    CosineWeightedSqrt,
    CosineMerge,
    Rarity,
    RarityLog,
}

enum ScorerKind<'a> {
    PerExemplar {
        pool: &'a ExemplarPool,
        measure: Pairwise,
        aggregation: Aggregation,
        sqrt: bool,
    },
    Merged {
        union: FollowerSet,
        measure: Pairwise,
    },
    Rarity {
        weights: HashMap<u64, f64>,
    },
}

/// A scoring method bound to an exemplar pool, with any per-pool state
/// (merged union, rarity weight table) computed once up front.
pub struct MethodScorer<'a> {
    kind: ScorerKind<'a>,
}

impl<'a> MethodScorer<'a> {
    pub fn new(method: NetworkMethod, pool: &'a ExemplarPool) -> Result<Self> {
        if pool.is_empty() {
            bail!("exemplar pool is empty; check the min/max follower window and blacklist");
        }
        use NetworkMethod::*;
        let kind = match method {
            JaccardMerge => merged(pool, Pairwise::Jaccard),
            ProportionMerge => merged(pool, Pairwise::Proportion),
            CosineMerge => merged(pool, Pairwise::Cosine),
            Rarity => ScorerKind::Rarity {
                weights: rarity::rarity_weights(pool),
            },
            RarityLog => ScorerKind::Rarity {
                weights: rarity::rarity_weights_log(pool),
            },
            _ => {
                let (measure, aggregation, sqrt) = match method {
                    Jaccard => (Pairwise::Jaccard, Aggregation::Mean, false),
                    JaccardWeighted => (Pairwise::Jaccard, Aggregation::WeightedMean, false),
                    JaccardSqrt => (Pairwise::Jaccard, Aggregation::Mean, true),
                    JaccardWeightedSqrt => (Pairwise::Jaccard, Aggregation::WeightedMean, true),
                    Proportion => (Pairwise::Proportion, Aggregation::Mean, false),
                    ProportionWeighted => (Pairwise::Proportion, Aggregation::WeightedMean, false),
                    ProportionSqrt => (Pairwise::Proportion, Aggregation::Mean, true),
                    ProportionWeightedSqrt => {
                        (Pairwise::Proportion, Aggregation::WeightedMean, true)
                    }
                    Cosine => (Pairwise::Cosine, Aggregation::Mean, false),
                    CosineWeighted => (Pairwise::Cosine, Aggregation::WeightedMean, false),
                    CosineSqrt => (Pairwise::Cosine, Aggregation::Mean, true),
                    CosineWeightedSqrt => (Pairwise::Cosine, Aggregation::WeightedMean, true),
                    _ => unreachable!("merge and rarity variants handled above"),
                };
                ScorerKind::PerExemplar {
                    pool,
                    measure,
                    aggregation,
                    sqrt,
                }
            }
        };
        Ok(Self { kind })
    }

    /// Score one brand follower set.
    pub fn score(&self, followers: &FollowerSet) -> Result<f64> {
        match &self.kind {
            ScorerKind::PerExemplar {
                pool,
                measure,
                aggregation,
                sqrt,
            } => similarity::score_set(followers, pool, *measure, *aggregation, *sqrt),
            ScorerKind::Merged { union, measure } => {
                if followers.is_empty() {
                    bail!("similarity undefined for an empty brand follower set");
                }
                Ok(match measure {
                    Pairwise::Jaccard => similarity::jaccard(followers, union),
                    Pairwise::Proportion => similarity::proportion(followers, union),
                    Pairwise::Cosine => similarity::cosine(followers, union),
                })
            }
            ScorerKind::Rarity { weights } => rarity::rarity_score(followers, weights),
        }
    }
}

fn merged(pool: &ExemplarPool, measure: Pairwise) -> ScorerKind<'static> {
    ScorerKind::Merged {
        union: similarity::merge_pool(pool),
        measure,
    }
}

/// Score a stream of brands against the pool. Brands whose score is
/// undefined (empty follower set) are logged and skipped, never written
/// as a silent zero.
pub fn score_stream<I>(brands: I, pool: &ExemplarPool, method: NetworkMethod) -> Result<ScoreMap>
where
    I: IntoIterator<Item = Result<(String, FollowerSet)>>,
{
    let scorer = MethodScorer::new(method, pool)?;
    let mut scores = ScoreMap::new();
    for record in brands {
        let (brand, followers) = record?;
        match scorer.score(&followers) {
            Ok(score) => {
                scores.insert(brand, score);
            }
            Err(e) => warn!(brand = %brand, error = %e, "skipping brand"),
        }
    }
    Ok(scores)
}

/// Draw `percent`% of the pool uniformly at random without replacement.
/// Deterministic for a fixed seed and pool: the pool's sorted key order
/// is the sampling frame.
pub fn sample_pool(pool: ExemplarPool, percent: f64, rng: &mut StdRng) -> ExemplarPool {
    let amount = (pool.len() as f64 * percent / 100.0).floor() as usize;
    let keys: Vec<&String> = pool.keys().collect();
    let chosen: std::collections::HashSet<String> = rand::seq::index::sample(rng, keys.len(), amount)
        .into_iter()
        .map(|i| keys[i].clone())
        .collect();
    pool.into_iter()
        .filter(|(name, _)| chosen.contains(name))
        .collect()
}

/// Load the exemplar pool for a run: the brand file supplies the
/// blacklist so brand accounts can never double as exemplars.
pub fn load_pool(
    exemplar_followers: &std::path::Path,
    brand_followers: &std::path::Path,
    min_followers: usize,
    max_followers: usize,
) -> Result<ExemplarPool> {
    let blacklist = read_handles(brand_followers)
        .context("reading brand handles for the exemplar blacklist")?;
    read_follower_file(exemplar_followers, min_followers, max_followers, &blacklist)
}

/// Full network scoring run: load, filter, sample, score, write.
pub fn run(opts: &NetworkOptions) -> Result<ScoreMap> {
    opts.validate()?;

    let mut pool = load_pool(
        &opts.exemplar_followers,
        &opts.brand_followers,
        opts.min_followers,
        opts.max_followers,
    )?;
    info!(exemplars = pool.len(), "read exemplar follower data");

    if opts.sample_exemplars < 100.0 {
        let mut rng = StdRng::seed_from_u64(opts.seed);
        pool = sample_pool(pool, opts.sample_exemplars, &mut rng);
        info!(exemplars = pool.len(), "sampled exemplar pool");
    }

    if pool.is_empty() {
        bail!(
            "no exemplars remained after filtering (min_followers={}, max_followers={}, \
             sample_exemplars={}%)",
            opts.min_followers,
            opts.max_followers,
            opts.sample_exemplars
        );
    }

    let brands = FollowerStream::open(&opts.brand_followers)?;
    let scores = score_stream(brands, &pool, opts.method)?;

    let mut writer = ScoreWriter::create(&opts.output)?;
    for (brand, score) in &scores {
        writer.write_score(brand, *score)?;
    }
    info!(brands = scores.len(), output = %opts.output.display(), "results written");
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(entries: &[(&str, &[u64])]) -> ExemplarPool {
        entries
            .iter()
            .map(|(name, ids)| (name.to_string(), ids.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn sampling_is_deterministic_for_a_fixed_seed() {
        let entries: Vec<(String, FollowerSet)> = (0..50)
            .map(|i| (format!("ex{i:02}"), FollowerSet::from([i, i + 1])))
            .collect();
        let pool: ExemplarPool = entries.into_iter().collect();

        let mut rng_a = StdRng::seed_from_u64(12345);
        let mut rng_b = StdRng::seed_from_u64(12345);
        let a = sample_pool(pool.clone(), 40.0, &mut rng_a);
        let b = sample_pool(pool.clone(), 40.0, &mut rng_b);
        assert_eq!(a.len(), 20);
        assert_eq!(a, b);
    }

    #[test]
    fn sampling_takes_the_floor_of_the_fraction() {
        let pool = pool(&[("a", &[1, 2]), ("b", &[2, 3]), ("c", &[3, 4])]);
        let mut rng = StdRng::seed_from_u64(1);
        let sampled = sample_pool(pool, 50.0, &mut rng);
        assert_eq!(sampled.len(), 1);
    }

    #[test]
    fn empty_pool_is_a_configuration_error() {
        let pool = ExemplarPool::new();
        assert!(MethodScorer::new(NetworkMethod::Jaccard, &pool).is_err());
    }

    #[test]
    fn stream_skips_undefined_brands() {
        let pool = pool(&[("e1", &[1, 2, 3])]);
        let brands = vec![
            Ok(("good".to_string(), FollowerSet::from([1, 2]))),
            Ok(("hollow".to_string(), FollowerSet::new())),
        ];
        let scores = score_stream(brands, &pool, NetworkMethod::Jaccard).unwrap();
        assert_eq!(scores.len(), 1);
        assert!(scores.contains_key("good"));
    }

    #[test]
    fn merge_scorer_matches_union_similarity() {
        let pool = pool(&[("e1", &[1, 2, 3]), ("e2", &[3, 4])]);
        let brand = FollowerSet::from([2, 3, 4]);
        let scorer = MethodScorer::new(NetworkMethod::JaccardMerge, &pool).unwrap();
        let score = scorer.score(&brand).unwrap();
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn rarity_scorer_uses_the_weight_table() {
        let pool = pool(&[("e1", &[1, 2, 3, 4]), ("e2", &[4, 5])]);
        let brand = FollowerSet::from([4, 5]);
        let scorer = MethodScorer::new(NetworkMethod::Rarity, &pool).unwrap();
        let score = scorer.score(&brand).unwrap();
        assert!((score - (0.75 + 0.5) / 2.0).abs() < 1e-12);
    }
}

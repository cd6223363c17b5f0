// Validation diagnostics.
//
// Given ground-truth scores for a subset of brands, measure how well a
// network scoring method tracks them: an overall Pearson correlation over
// the full pool, then a per-exemplar leave-one-in ablation that scores
// every brand against each single exemplar in isolation. The ablation
// ranks exemplars by individual predictive power — a curation diagnostic,
// not a scoring method.

use std::collections::HashMap;

use anyhow::{bail, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::DiagnoseOptions;
use crate::io::followers::FollowerStream;
use crate::io::scores::read_scores;
use crate::network::{load_pool, MethodScorer, NetworkMethod};
use crate::output::ReportWriter;
use crate::stats::pearson;
use crate::{ExemplarPool, FollowerSet, ScoreMap};

/// Score every brand against the pool with the given method, skipping
/// brands whose score is undefined.
fn score_all(
    brands: &[(String, FollowerSet)],
    pool: &ExemplarPool,
    method: NetworkMethod,
) -> Result<ScoreMap> {
    let scorer = MethodScorer::new(method, pool)?;
    let mut scores = ScoreMap::new();
    for (brand, followers) in brands {
        match scorer.score(followers) {
            Ok(score) => {
                scores.insert(brand.clone(), score);
            }
            Err(e) => warn!(brand = %brand, error = %e, "skipping brand"),
        }
    }
    Ok(scores)
}

/// Align predicted scores with ground truth over the handles present in
/// both, sorted by handle for a stable pairing.
fn paired(scores: &ScoreMap, validation: &HashMap<String, f64>) -> (Vec<f64>, Vec<f64>) {
    let mut keys: Vec<&String> = validation.keys().filter(|k| scores.contains_key(*k)).collect();
    keys.sort();
    let predicted = keys.iter().map(|k| scores[*k]).collect();
    let truth = keys.iter().map(|k| validation[*k]).collect();
    (predicted, truth)
}

/// Full diagnostic run. Returns the overall correlation.
pub fn run(opts: &DiagnoseOptions) -> Result<f64> {
    let validation = read_scores(&opts.validation)?;
    if validation.is_empty() {
        bail!("validation file {} holds no scores", opts.validation.display());
    }
    info!(brands = validation.len(), "read validation scores");

    let pool = load_pool(
        &opts.exemplar_followers,
        &opts.brand_followers,
        0,
        usize::MAX,
    )?;
    if pool.is_empty() {
        bail!("exemplar pool is empty after blacklist filtering");
    }
    info!(exemplars = pool.len(), "read exemplar follower data");

    // The ablation re-scores the same brands once per exemplar, so here
    // brands are materialized rather than streamed.
    let brands: Vec<(String, FollowerSet)> =
        FollowerStream::open(&opts.brand_followers)?.collect::<Result<_>>()?;

    let full_scores = score_all(&brands, &pool, opts.method)?;
    let (predicted, truth) = paired(&full_scores, &validation);
    let overall = pearson(&predicted, &truth)?;
    println!(
        "{} {overall:.4} (over {} brands)",
        "Overall Pearson correlation:".bold(),
        predicted.len()
    );

    let mut report = ReportWriter::create(&opts.output)?;
    let pb = ProgressBar::new(pool.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("ablating exemplars");

    for (exemplar, followers) in &pool {
        let mut single = ExemplarPool::new();
        single.insert(exemplar.clone(), followers.clone());
        let scores = score_all(&brands, &single, opts.method)?;
        let (predicted, truth) = paired(&scores, &validation);
        match pearson(&predicted, &truth) {
            Ok(corr) => report.write_row(exemplar, corr, followers.len())?,
            Err(e) => warn!(exemplar = %exemplar, error = %e, "correlation undefined, row skipped"),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(output = %opts.output.display(), "diagnostic report written");
    Ok(overall)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brands() -> Vec<(String, FollowerSet)> {
        vec![
            ("b1".to_string(), FollowerSet::from([1, 2, 3])),
            ("b2".to_string(), FollowerSet::from([1, 2, 9])),
            ("b3".to_string(), FollowerSet::from([8, 9])),
        ]
    }

    #[test]
    fn identical_prediction_and_truth_correlate_perfectly() {
        let pool: ExemplarPool = [("e1".to_string(), FollowerSet::from([1, 2, 3]))]
            .into_iter()
            .collect();
        let scores = score_all(&brands(), &pool, NetworkMethod::Jaccard).unwrap();
        let validation: HashMap<String, f64> =
            scores.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let (predicted, truth) = paired(&scores, &validation);
        assert_eq!(predicted.len(), 3);
        let r = pearson(&predicted, &truth).unwrap();
        assert!((r - 1.0).abs() < 1e-9, "got {r}");
    }

    #[test]
    fn pairing_restricts_to_shared_handles() {
        let scores: ScoreMap = [("a".to_string(), 0.1), ("b".to_string(), 0.2)]
            .into_iter()
            .collect();
        let validation: HashMap<String, f64> =
            [("b".to_string(), 0.9), ("zz".to_string(), 0.5)]
                .into_iter()
                .collect();
        let (predicted, truth) = paired(&scores, &validation);
        assert_eq!(predicted, vec![0.2]);
        assert_eq!(truth, vec![0.9]);
    }
}

// Discriminative term selection.
//
// A lightweight feature-selection pipeline over the frozen bigram space:
// fit an L2-regularized logistic regression separating exemplar documents
// from background-sample documents, rank terms by a chi-squared
// independence statistic, keep the top N whose classifier coefficient is
// positive (exemplar-indicative), and weight each kept term by its
// statistic. Only the coefficient signs are consumed, so a plain
// full-batch gradient fit is sufficient.

use anyhow::{ensure, Result};
use ndarray::Array1;

const GD_ITERATIONS: usize = 500;
const GD_LEARNING_RATE: f64 = 0.5;
const L2_PENALTY: f64 = 1.0;

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Fit L2-regularized logistic regression over sparse binary rows.
/// Returns the per-feature coefficient vector (intercept discarded).
pub fn fit_logistic(rows: &[Vec<usize>], labels: &[f64], n_features: usize) -> Array1<f64> {
    let n = rows.len() as f64;
    let mut weights = Array1::<f64>::zeros(n_features);
    let mut bias = 0.0;

    for _ in 0..GD_ITERATIONS {
        let mut grad = &weights * (L2_PENALTY / n);
        let mut grad_bias = 0.0;
        for (row, &label) in rows.iter().zip(labels) {
            let z = bias + row.iter().map(|&j| weights[j]).sum::<f64>();
            let err = (sigmoid(z) - label) / n;
            for &j in row {
                grad[j] += err;
            }
            grad_bias += err;
        }
        weights -= &(grad * GD_LEARNING_RATE);
        bias -= GD_LEARNING_RATE * grad_bias;
    }
    weights
}

/// Chi-squared independence statistic per feature between term presence
/// and the exemplar/sample label. Features absent from both corpora get 0.
pub fn chi2_scores(
    positives: &[Vec<usize>],
    negatives: &[Vec<usize>],
    n_features: usize,
) -> Result<Array1<f64>> {
    ensure!(
        !positives.is_empty() && !negatives.is_empty(),
        "chi-squared needs documents in both classes ({} exemplar, {} sample)",
        positives.len(),
        negatives.len()
    );

    let mut obs_pos = Array1::<f64>::zeros(n_features);
    let mut obs_neg = Array1::<f64>::zeros(n_features);
    for row in positives {
        for &j in row {
            obs_pos[j] += 1.0;
        }
    }
    for row in negatives {
        for &j in row {
            obs_neg[j] += 1.0;
        }
    }

    let n_pos = positives.len() as f64;
    let n_neg = negatives.len() as f64;
    let n = n_pos + n_neg;

    let mut chis = Array1::<f64>::zeros(n_features);
    for j in 0..n_features {
        let total = obs_pos[j] + obs_neg[j];
        if total == 0.0 {
            continue;
        }
        let exp_pos = total * n_pos / n;
        let exp_neg = total * n_neg / n;
        chis[j] = (obs_pos[j] - exp_pos).powi(2) / exp_pos
            + (obs_neg[j] - exp_neg).powi(2) / exp_neg;
    }
    Ok(chis)
}

/// Run the full selection: returns the term-weight vector where the top
/// `top_n` chi-squared-ranked, positively-weighted terms carry their
/// statistic and every other term carries 0.
///
/// Ranking is a stable sort by statistic descending; ties break by
/// original vocabulary index.
pub fn select_discriminative_terms(
    exemplars: &[Vec<usize>],
    samples: &[Vec<usize>],
    n_features: usize,
    top_n: usize,
) -> Result<Array1<f64>> {
    let chis = chi2_scores(exemplars, samples, n_features)?;

    let mut rows: Vec<Vec<usize>> = Vec::with_capacity(exemplars.len() + samples.len());
    let mut labels: Vec<f64> = Vec::with_capacity(exemplars.len() + samples.len());
    for row in exemplars {
        rows.push(row.clone());
        labels.push(1.0);
    }
    for row in samples {
        rows.push(row.clone());
        labels.push(0.0);
    }
    let coef = fit_logistic(&rows, &labels, n_features);

    let mut ranked: Vec<usize> = (0..n_features).collect();
    ranked.sort_by(|&a, &b| chis[b].total_cmp(&chis[a]).then(a.cmp(&b)));

    let mut weights = Array1::<f64>::zeros(n_features);
    for &j in ranked.iter().filter(|&&j| coef[j] > 0.0).take(top_n) {
        weights[j] = chis[j];
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Feature 0 marks positives, feature 1 marks negatives, feature 2 is
    // uninformative noise present everywhere.
    fn corpus() -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
        let positives = vec![vec![0, 2]; 6];
        let negatives = vec![vec![1, 2]; 6];
        (positives, negatives)
    }

    #[test]
    fn chi2_separates_signal_from_noise() {
        let (pos, neg) = corpus();
        let chis = chi2_scores(&pos, &neg, 3).unwrap();
        assert!(chis[0] > 0.0);
        assert!((chis[0] - chis[1]).abs() < 1e-9, "symmetric features tie");
        assert!(chis[2].abs() < 1e-9, "everywhere-feature carries nothing");
        // perfectly separating feature, 6 docs per class: observed (6, 0)
        // against expected (3, 3) gives 3 + 3 = 6
        assert!((chis[0] - 6.0).abs() < 1e-9, "got {}", chis[0]);
    }

    #[test]
    fn unused_features_score_zero() {
        let (pos, neg) = corpus();
        let chis = chi2_scores(&pos, &neg, 5).unwrap();
        assert_eq!(chis[3], 0.0);
        assert_eq!(chis[4], 0.0);
    }

    #[test]
    fn empty_class_is_error() {
        assert!(chi2_scores(&[], &[vec![0]], 1).is_err());
    }

    #[test]
    fn logistic_coefficients_have_the_right_signs() {
        let (pos, neg) = corpus();
        let mut rows = pos.clone();
        rows.extend(neg.clone());
        let mut labels = vec![1.0; 6];
        labels.extend(vec![0.0; 6]);
        let coef = fit_logistic(&rows, &labels, 3);
        assert!(coef[0] > 0.0, "positive marker must get a positive weight");
        assert!(coef[1] < 0.0, "negative marker must get a negative weight");
    }

    #[test]
    fn selection_keeps_only_positive_coefficient_terms() {
        let (pos, neg) = corpus();
        let weights = select_discriminative_terms(&pos, &neg, 3, 300).unwrap();
        assert!(weights[0] > 0.0);
        assert_eq!(weights[1], 0.0, "sample-indicative term must be dropped");
        assert_eq!(weights[2], 0.0);
        assert!((weights[0] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn top_n_truncates_by_rank_with_index_tiebreak() {
        // Features 0 and 1 are both exemplar-indicative with identical
        // distributions; top_n = 1 must keep the lower index.
        let positives = vec![vec![0, 1]; 5];
        let negatives = vec![vec![2]; 5];
        let weights = select_discriminative_terms(&positives, &negatives, 3, 1).unwrap();
        assert!(weights[0] > 0.0);
        assert_eq!(weights[1], 0.0);
    }
}

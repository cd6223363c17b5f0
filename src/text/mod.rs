// Text scoring — discriminative-bigram affinity.
//
// Fit the vectorizer on the exemplar corpus, select the bigrams that
// separate exemplars from a background sample, then score each brand by
// the fraction of total discriminative weight its document exhibits.

pub mod model;
pub mod preprocess;
pub mod vectorize;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::ValueEnum;
use colored::Colorize;
use ndarray::Array1;
use tracing::info;

use crate::config::TextOptions;
use crate::io::tweets::{read_docs, TweetDocs};
use crate::output::{format_g, write_top_terms, ScoreWriter};
use crate::ScoreMap;

use vectorize::BigramVectorizer;

/// The closed set of text scoring methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextMethod {
    /// Chi-squared-ranked, positive-coefficient-filtered term selection.
    Chi2,
}

/// Score one document row: the fraction of total discriminative weight
/// present in it. Not a probability — a coverage ratio.
pub fn score_document(row: &[usize], weights: &Array1<f64>, total_weight: f64) -> f64 {
    row.iter().map(|&j| weights[j]).sum::<f64>() / total_weight
}

fn topwords_path(output: &PathBuf) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".topwords");
    PathBuf::from(name)
}

/// Full text scoring run: fit, select, score, write.
pub fn run(opts: &TextOptions) -> Result<ScoreMap> {
    opts.validate()?;

    let exemplar_docs = read_docs(&opts.exemplar_tweets)?;
    if exemplar_docs.is_empty() {
        bail!(
            "no exemplar tweet documents in {}",
            opts.exemplar_tweets.display()
        );
    }
    info!(accounts = exemplar_docs.len(), "read exemplar tweets");

    let exemplar_texts: Vec<&str> = exemplar_docs.iter().map(|(_, t)| t.as_str()).collect();
    let vectorizer = BigramVectorizer::fit(&exemplar_texts, opts.min_df)?;
    info!(terms = vectorizer.len(), "fitted bigram vocabulary");

    let sample_docs = read_docs(&opts.sample_tweets)?;
    if sample_docs.is_empty() {
        bail!(
            "no background-sample tweet documents in {}",
            opts.sample_tweets.display()
        );
    }
    info!(accounts = sample_docs.len(), "read sample tweets");

    let exemplar_rows: Vec<Vec<usize>> = exemplar_texts
        .iter()
        .map(|t| vectorizer.transform(t))
        .collect();
    let sample_rows: Vec<Vec<usize>> = sample_docs
        .iter()
        .map(|(_, t)| vectorizer.transform(t))
        .collect();

    let weights = match opts.method {
        TextMethod::Chi2 => model::select_discriminative_terms(
            &exemplar_rows,
            &sample_rows,
            vectorizer.len(),
            opts.top_terms,
        )?,
    };
    let total_weight = weights.sum();
    if total_weight <= 0.0 {
        bail!("no exemplar-indicative terms were selected; the exemplar and sample corpora may be indistinguishable");
    }

    write_top_terms(&topwords_path(&opts.output), vectorizer.vocabulary(), &weights.to_vec())?;
    print_top_terms(&vectorizer, &weights);

    let mut scores = ScoreMap::new();
    for doc in TweetDocs::open(&opts.brand_tweets)? {
        let (brand, text) = doc?;
        let row = vectorizer.transform(&text);
        scores.insert(brand, score_document(&row, &weights, total_weight));
    }
    info!(brands = scores.len(), "scored brand tweets");

    let mut writer = ScoreWriter::create(&opts.output)?;
    for (brand, score) in &scores {
        writer.write_score(brand, *score)?;
    }
    info!(output = %opts.output.display(), "results written");
    Ok(scores)
}

fn print_top_terms(vectorizer: &BigramVectorizer, weights: &Array1<f64>) {
    let mut order: Vec<usize> = (0..weights.len()).filter(|&j| weights[j] > 0.0).collect();
    order.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));

    println!("{}", "Top discriminative bigrams:".bold());
    for &j in order.iter().take(10) {
        println!(
            "  {} = {}",
            vectorizer.vocabulary()[j],
            format_g(weights[j]).dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_a_weight_fraction() {
        let weights = Array1::from(vec![3.0, 0.0, 1.0]);
        let score = score_document(&[0, 2], &weights, 4.0);
        assert!((score - 1.0).abs() < 1e-12);
        let partial = score_document(&[2], &weights, 4.0);
        assert!((partial - 0.25).abs() < 1e-12);
    }

    #[test]
    fn empty_document_scores_zero() {
        let weights = Array1::from(vec![3.0, 1.0]);
        assert_eq!(score_document(&[], &weights, 4.0), 0.0);
    }

    #[test]
    fn topwords_path_appends_suffix() {
        let p = topwords_path(&PathBuf::from("out/scores.txt"));
        assert_eq!(p, PathBuf::from("out/scores.txt.topwords"));
    }
}

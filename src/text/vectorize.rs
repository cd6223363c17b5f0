// Binary bigram vectorizer with a frozen vocabulary.
//
// Fit once on the exemplar corpus; transform-only for sample and brand
// corpora. A bigram enters the vocabulary only if it appears in at least
// `min_df` distinct exemplar documents (noise floor). Features are
// presence bits, not counts — a term used once and a term used hourly
// look the same to the classifier.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex_lite::Regex;

use super::preprocess::preprocess;

// Tokens are runs of 2+ word characters; single characters are noise.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

fn bigrams(doc: &str) -> HashSet<String> {
    let text = preprocess(doc);
    let tokens: Vec<&str> = TOKEN.find_iter(&text).map(|m| m.as_str()).collect();
    tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

#[derive(Debug)]
pub struct BigramVectorizer {
    index: HashMap<String, usize>,
    terms: Vec<String>,
}

impl BigramVectorizer {
    /// Build the vocabulary from the fitting corpus. Terms are indexed in
    /// lexicographic order; this order is the tie-break for feature
    /// ranking downstream, so it must be stable.
    pub fn fit<S: AsRef<str>>(docs: &[S], min_df: usize) -> Result<Self> {
        let mut df: HashMap<String, usize> = HashMap::new();
        for doc in docs {
            for term in bigrams(doc.as_ref()) {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<String> = df
            .into_iter()
            .filter(|(_, count)| *count >= min_df)
            .map(|(term, _)| term)
            .collect();
        terms.sort();

        if terms.is_empty() {
            bail!(
                "vocabulary is empty: no bigram appears in at least {min_df} of the {} fitting \
                 documents; the corpus is too small or too uniform",
                docs.len()
            );
        }

        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Ok(Self { index, terms })
    }

    /// Sparse presence vector for one document: sorted indices of the
    /// vocabulary terms it contains. Out-of-vocabulary bigrams are
    /// dropped — the vocabulary is frozen at fit time.
    pub fn transform(&self, doc: &str) -> Vec<usize> {
        let mut indices: Vec<usize> = bigrams(doc)
            .iter()
            .filter_map(|term| self.index.get(term).copied())
            .collect();
        indices.sort_unstable();
        indices
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

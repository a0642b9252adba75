// src/matcher/textsim.rs
//! Narrative similarity between a candidate's experience text and a vacancy
//! description.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use super::fuzzy::token_set_ratio;

// Unicode-aware: `\w` covers Cyrillic as well as Latin.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

pub const DEFAULT_MAX_FEATURES: usize = 10_000;

/// Sparse row: vocabulary index -> weight.
pub type SparseVector = HashMap<usize, f64>;

/// TF-IDF over word n-grams, fitted jointly on the documents it transforms.
///
/// Tokens are lowercased runs of two or more word characters. Weights use raw
/// term counts with smoothed idf `ln((1 + n) / (1 + df)) + 1`, and every row
/// is L2-normalized so cosine similarity is a plain dot product.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    ngram_range: (usize, usize),
    max_features: Option<usize>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            max_features: Some(DEFAULT_MAX_FEATURES),
        }
    }
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        self.ngram_range = (min_n, max_n.max(min_n));
        self
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Splits a document into its n-gram terms, in document order.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();
        let (min_n, max_n) = self.ngram_range;

        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Fits the vocabulary on `docs` and returns one normalized row per doc.
    pub fn fit_transform(&self, docs: &[&str]) -> Vec<SparseVector> {
        let analyzed: Vec<Vec<String>> = docs.iter().map(|doc| self.analyze(doc)).collect();

        let mut counts: Vec<HashMap<&str, usize>> = Vec::with_capacity(analyzed.len());
        let mut corpus_freq: BTreeMap<&str, usize> = BTreeMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();

        for terms in &analyzed {
            let mut row: HashMap<&str, usize> = HashMap::new();
            for term in terms {
                *row.entry(term.as_str()).or_default() += 1;
                *corpus_freq.entry(term.as_str()).or_default() += 1;
            }
            for term in row.keys() {
                *doc_freq.entry(*term).or_default() += 1;
            }
            counts.push(row);
        }

        let vocabulary = self.select_vocabulary(&corpus_freq);
        let n_docs = docs.len() as f64;

        counts
            .iter()
            .map(|row| {
                let mut vector: SparseVector = row
                    .iter()
                    .filter_map(|(term, &tf)| {
                        let &index = vocabulary.get(term)?;
                        let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                        let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
                        Some((index, tf as f64 * idf))
                    })
                    .collect();
                let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    vector.values_mut().for_each(|w| *w /= norm);
                }
                vector
            })
            .collect()
    }

    /// Keeps the most frequent terms when the vocabulary exceeds
    /// `max_features`; ties resolve alphabetically.
    fn select_vocabulary<'t>(&self, corpus_freq: &BTreeMap<&'t str, usize>) -> HashMap<&'t str, usize> {
        let mut terms: Vec<(&str, usize)> = corpus_freq.iter().map(|(t, &f)| (*t, f)).collect();
        if let Some(limit) = self.max_features {
            if terms.len() > limit {
                terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                terms.truncate(limit);
                terms.sort_by(|a, b| a.0.cmp(b.0));
            }
        }
        terms
            .into_iter()
            .enumerate()
            .map(|(index, (term, _))| (term, index))
            .collect()
    }
}

/// Cosine similarity of two L2-normalized rows. A zero row scores 0.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(index, wa)| large.get(index).map(|wb| wa * wb))
        .sum()
}

/// Returns a similarity in `[0, 1]`. A missing or blank text on either side
/// yields `neutral_if_empty` without comparing anything.
pub fn text_similarity(
    text_a: Option<&str>,
    text_b: Option<&str>,
    use_tfidf: bool,
    neutral_if_empty: f64,
) -> f64 {
    let (a, b) = match (text_a, text_b) {
        (Some(a), Some(b)) if !a.trim().is_empty() && !b.trim().is_empty() => (a, b),
        _ => return neutral_if_empty,
    };

    let similarity = if use_tfidf {
        let rows = TfidfVectorizer::new().fit_transform(&[a, b]);
        match rows.as_slice() {
            [row_a, row_b] => cosine_similarity(row_a, row_b),
            _ => 0.0,
        }
    } else {
        token_set_ratio(a, b) / 100.0
    };

    similarity.clamp(0.0, 1.0)
}

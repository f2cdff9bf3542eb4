//! # ChatMind Vector Space Builder
//!
//! File: cli/src/engine/vector_space.rs
//!
//! ## Overview
//!
//! Fits a TF-IDF model over the corpus questions and produces one weighted,
//! unit-length sparse vector per question (the corpus matrix).
//!
//! ## Weighting
//!
//! For a term `t` in document `d` of an `N`-document corpus:
//!
//! ```text
//! tf(t, d)  = number of occurrences of t in d
//! idf(t)    = ln((1 + N) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t)
//! ```
//!
//! The `1 +` terms smooth the ratio so a term that appears in every document
//! still has a positive weight, and `df(t)` can never be zero for a fitted
//! term. Rows are then L2-normalized, which makes cosine similarity a plain
//! dot product.
//!
//! Dimension indices follow the lexicographic order of the vocabulary, so two
//! fits over the same questions produce identical models.
//!
use super::text;
use crate::core::error::{ChatError, Result};
use anyhow::anyhow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// A unit-length (or all-zero) vector stored as `(dimension, weight)` pairs sorted by dimension.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Builds a normalized vector from raw weights. Zero weights are dropped.
    fn from_weights(weights: BTreeMap<usize, f64>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Self::default();
        }
        Self {
            entries: weights
                .into_iter()
                .filter(|(_, w)| *w != 0.0)
                .map(|(dim, w)| (dim, w / norm))
                .collect(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Cosine similarity with another vector from the same space, clamped to `[0, 1]`.
    ///
    /// Both vectors are already unit length, so this is a sorted merge-join dot
    /// product. Either vector being zero gives `0.0`.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_dim, a_w) = self.entries[i];
            let (b_dim, b_w) = other.entries[j];
            match a_dim.cmp(&b_dim) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot.clamp(0.0, 1.0)
    }
}

/// One vector per corpus question, aligned by index with the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusMatrix {
    rows: Vec<SparseVector>,
}

impl CorpusMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    #[cfg(test)]
    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }
}

/// The fitted vocabulary and its IDF weights.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSpaceModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl VectorSpaceModel {
    /// Fits the model on `questions` and returns it with the corpus matrix.
    ///
    /// Questions are normalized here, so callers may pass raw text.
    ///
    /// ## Errors
    ///
    /// Returns `ChatError::EmptyCorpus` when there are no questions, or when no
    /// question contains a single term (nothing to build a vocabulary from).
    pub fn fit<S: AsRef<str>>(questions: &[S]) -> Result<(Self, CorpusMatrix)> {
        if questions.is_empty() {
            return Err(anyhow!(ChatError::EmptyCorpus));
        }

        let normalized: Vec<String> = questions
            .iter()
            .map(|q| text::normalize(q.as_ref()))
            .collect();
        let documents: Vec<Vec<&str>> = normalized.iter().map(|q| text::tokenize(q)).collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &documents {
            let unique: BTreeSet<&str> = tokens.iter().copied().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }
        if doc_freq.is_empty() {
            return Err(anyhow!(ChatError::EmptyCorpus));
        }

        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        // BTreeMap iteration is sorted, which fixes the dimension order.
        for (dim, (term, df)) in doc_freq.iter().enumerate() {
            vocabulary.insert((*term).to_string(), dim);
            idf.push(((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0);
        }

        let model = Self { vocabulary, idf };
        let rows = documents
            .iter()
            .map(|tokens| model.weigh(tokens))
            .collect();
        debug!(
            "Fitted vector space: {} documents, {} terms",
            documents.len(),
            model.dimensions()
        );
        Ok((model, CorpusMatrix { rows }))
    }

    /// Projects arbitrary text into the fitted space. Unknown terms contribute nothing.
    pub fn transform(&self, text: &str) -> SparseVector {
        let normalized = text::normalize(text);
        self.weigh(&text::tokenize(&normalized))
    }

    pub fn dimensions(&self) -> usize {
        self.idf.len()
    }

    #[cfg(test)]
    pub fn dimension_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    #[cfg(test)]
    pub fn idf_of(&self, term: &str) -> Option<f64> {
        self.dimension_of(term).map(|dim| self.idf[dim])
    }

    fn weigh(&self, tokens: &[&str]) -> SparseVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens {
            if let Some(&dim) = self.vocabulary.get(*token) {
                *weights.entry(dim).or_insert(0.0) += self.idf[dim];
            }
        }
        SparseVector::from_weights(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn questions() -> Vec<&'static str> {
        vec![
            "what is rust",
            "what is python",
            "how do i install rust",
        ]
    }

    #[test]
    fn fit_builds_sorted_vocabulary() {
        let (model, matrix) = VectorSpaceModel::fit(&questions()).unwrap();
        // "i" is a single character and never becomes a term.
        assert_eq!(model.dimensions(), 7);
        assert_eq!(model.dimension_of("do"), Some(0));
        assert_eq!(model.dimension_of("what"), Some(6));
        assert_eq!(model.dimension_of("i"), None);
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn idf_is_smoothed() {
        let (model, _) = VectorSpaceModel::fit(&questions()).unwrap();
        // "rust": df = 2 of N = 3.
        let expected_rust = (4.0f64 / 3.0).ln() + 1.0;
        assert!((model.idf_of("rust").unwrap() - expected_rust).abs() < EPS);
        // "python": df = 1.
        let expected_python = (4.0f64 / 2.0).ln() + 1.0;
        assert!((model.idf_of("python").unwrap() - expected_python).abs() < EPS);
        // Terms that appear everywhere still carry weight.
        let (model, _) = VectorSpaceModel::fit(&["hello there", "hello you"]).unwrap();
        assert!((model.idf_of("hello").unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn rows_are_unit_length() {
        let (_, matrix) = VectorSpaceModel::fit(&questions()).unwrap();
        for row in matrix.rows() {
            let norm: f64 = row.entries().iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn row_matches_transform_of_question() {
        let qs = questions();
        let (model, matrix) = VectorSpaceModel::fit(&qs).unwrap();
        for (i, q) in qs.iter().enumerate() {
            assert_eq!(matrix.row(i), Some(&model.transform(q)));
        }
    }

    #[test]
    fn transform_counts_repeated_terms() {
        let (model, _) = VectorSpaceModel::fit(&["rust rust python", "python"]).unwrap();
        let v = model.transform("rust rust python");
        let rust = model.dimension_of("rust").unwrap();
        let python = model.dimension_of("python").unwrap();
        let weight = |dim| v.entries().iter().find(|(d, _)| *d == dim).unwrap().1;
        assert!(weight(rust) > weight(python));
    }

    #[test]
    fn unknown_terms_are_dropped() {
        let (model, _) = VectorSpaceModel::fit(&questions()).unwrap();
        assert!(model.transform("xyz123 quantum").is_zero());
        assert!(model.transform("").is_zero());
        assert!(!model.transform("RUST??").is_zero());
    }

    #[test]
    fn cosine_bounds() {
        let (model, matrix) = VectorSpaceModel::fit(&questions()).unwrap();
        let q = model.transform("what is rust");
        assert!((q.cosine(&matrix.rows()[0]) - 1.0).abs() < EPS);
        let partial = q.cosine(&matrix.rows()[1]);
        assert!(partial > 0.0 && partial < 1.0);
        assert_eq!(SparseVector::default().cosine(&matrix.rows()[0]), 0.0);
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let empty: Vec<&str> = Vec::new();
        let err = VectorSpaceModel::fit(&empty).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatError>(),
            Some(ChatError::EmptyCorpus)
        ));
    }

    #[test]
    fn corpus_without_terms_is_rejected() {
        assert!(VectorSpaceModel::fit(&["?", "a b c"]).is_err());
    }

    #[test]
    fn fitting_is_deterministic() {
        let (a_model, a_matrix) = VectorSpaceModel::fit(&questions()).unwrap();
        let (b_model, b_matrix) = VectorSpaceModel::fit(&questions()).unwrap();
        assert_eq!(a_model, b_model);
        assert_eq!(a_matrix, b_matrix);
    }
}

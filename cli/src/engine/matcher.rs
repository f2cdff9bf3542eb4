//! # ChatMind Similarity Matcher
//!
//! File: cli/src/engine/matcher.rs
//!
//! ## Overview
//!
//! Finds the corpus question closest to a free-text query. The query is
//! normalized, projected into the fitted TF-IDF space (terms the corpus never
//! used are dropped), and compared by cosine similarity with every corpus row.
//! The best row wins; on equal scores the lowest index wins.
//!
//! The matcher only reports `(index, score)`. Deciding whether a score is good
//! enough to answer with belongs to the router.
//!
use super::corpus::Corpus;
use super::vector_space::{CorpusMatrix, VectorSpaceModel};
use crate::core::error::Result;

/// Result of a similarity lookup. `score` is always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub index: usize,
    pub score: f64,
}

/// A fitted model together with the corpus matrix it produced.
#[derive(Debug, Clone)]
pub struct Matcher {
    model: VectorSpaceModel,
    matrix: CorpusMatrix,
}

impl Matcher {
    /// Fits a matcher on the questions of `corpus`.
    pub fn fit(corpus: &Corpus) -> Result<Self> {
        let (model, matrix) = VectorSpaceModel::fit(corpus.normalized_questions())?;
        Ok(Self { model, matrix })
    }

    pub fn model(&self) -> &VectorSpaceModel {
        &self.model
    }

    #[cfg(test)]
    pub fn matrix(&self) -> &CorpusMatrix {
        &self.matrix
    }

    /// Cosine similarity of `query` against every corpus row, in corpus order.
    pub fn similarities(&self, query: &str) -> Vec<f64> {
        let query_vector = self.model.transform(query);
        if query_vector.is_zero() {
            return vec![0.0; self.matrix.len()];
        }
        self.matrix
            .rows()
            .iter()
            .map(|row| query_vector.cosine(row))
            .collect()
    }

    /// The best-scoring corpus row for `query`.
    ///
    /// A query with no known terms (including the empty string) scores `0.0`
    /// against every row and reports index 0.
    pub fn best_match(&self, query: &str) -> Match {
        let mut best = Match {
            index: 0,
            score: 0.0,
        };
        for (index, score) in self.similarities(query).into_iter().enumerate() {
            // Strictly greater keeps the first of equal scores.
            if score > best.score {
                best = Match { index, score };
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::corpus::CorpusEntry;

    fn corpus(pairs: &[(&str, &str)]) -> Corpus {
        Corpus::from_entries(
            pairs
                .iter()
                .map(|(q, a)| CorpusEntry {
                    question: q.to_string(),
                    answer: a.to_string(),
                })
                .collect(),
        )
        .unwrap()
    }

    fn sample() -> Corpus {
        corpus(&[
            ("hi", "hello!"),
            ("bye", "goodbye!"),
            ("what is rust", "A systems language."),
            ("how do I install rust", "Use rustup."),
        ])
    }

    #[test]
    fn exact_question_scores_one() {
        let matcher = Matcher::fit(&sample()).unwrap();
        let found = matcher.best_match("what is rust");
        assert_eq!(found.index, 2);
        assert!((found.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalization_applies_to_queries() {
        let matcher = Matcher::fit(&sample()).unwrap();
        let found = matcher.best_match("  HI ");
        assert_eq!(found.index, 0);
        assert!((found.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_overlap_picks_closest_row() {
        let matcher = Matcher::fit(&sample()).unwrap();
        let found = matcher.best_match("install rust please");
        assert_eq!(found.index, 3);
        assert!(found.score > 0.0 && found.score < 1.0);
    }

    #[test]
    fn unknown_and_empty_queries_score_zero() {
        let matcher = Matcher::fit(&sample()).unwrap();
        for query in ["xyz123", "", "   ", "?!"] {
            let found = matcher.best_match(query);
            assert_eq!(found, Match { index: 0, score: 0.0 }, "query {query:?}");
        }
    }

    #[test]
    fn duplicate_rows_resolve_to_lowest_index() {
        let matcher = Matcher::fit(&corpus(&[
            ("bye", "goodbye!"),
            ("tell me a joke", "first"),
            ("tell me a joke", "second"),
        ]))
        .unwrap();
        let found = matcher.best_match("tell me a joke");
        assert_eq!(found.index, 1);
    }

    #[test]
    fn scores_stay_in_range() {
        let corpus = sample();
        let matcher = Matcher::fit(&corpus).unwrap();
        for query in ["hi bye", "rust rust rust", "what is python", "hi what is rust"] {
            let found = matcher.best_match(query);
            assert!((0.0..=1.0).contains(&found.score));
            assert!(found.index < corpus.len());
            assert_eq!(matcher.similarities(query).len(), corpus.len());
        }
    }

    #[test]
    fn refitting_gives_identical_similarities() {
        let corpus = sample();
        let first = Matcher::fit(&corpus).unwrap();
        let second = Matcher::fit(&corpus).unwrap();
        for query in ["install rust", "hi", "what is it"] {
            assert_eq!(first.similarities(query), second.similarities(query));
        }
        assert_eq!(first.matrix().len(), corpus.len());
        assert_eq!(first.model(), second.model());
    }
}

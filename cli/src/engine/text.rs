//! Text normalization and tokenization shared by the corpus, the vectorizer and the router.
//!
//! Both the corpus questions and every incoming query go through the same
//! two steps, so a query and a question that differ only in case or
//! surrounding whitespace land on identical vectors.

/// Lower-cases and trims `text`.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Splits already-normalized text into terms.
///
/// A term is a maximal run of alphanumeric characters or `_` that is at least
/// two characters long; single-character runs are dropped.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().nth(1).is_some())
        .collect()
}

//! # ChatMind Corpus Loader
//!
//! File: cli/src/engine/corpus.rs
//!
//! ## Overview
//!
//! Loads the curated question/answer pairs the responder answers from. The
//! corpus is read once at startup and never changes afterwards; an entry's
//! identity is its row index in load order.
//!
//! ## File Format
//!
//! A CSV file with a header row naming at least a `Question` and an `Answer`
//! column (any other columns are ignored):
//!
//! ```text
//! Question,Answer
//! hi,hello!
//! "what is rust?","A systems programming language."
//! ```
//!
//! Every problem is reported up front rather than skipped: a missing file, a
//! missing column, a row without one of the two fields, or a file with no rows
//! at all stops the process from starting.
//!
use super::text;
use crate::core::error::{ChatError, Result};
use anyhow::anyhow;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const QUESTION_COLUMN: &str = "Question";
const ANSWER_COLUMN: &str = "Answer";

/// One curated question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub question: String,
    pub answer: String,
}

/// The ordered, read-only set of entries, with each question's normalized form kept alongside.
#[derive(Debug, Clone)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
    normalized_questions: Vec<String>,
}

impl Corpus {
    /// Builds a corpus from entries already in memory.
    ///
    /// ## Errors
    ///
    /// Returns `ChatError::EmptyCorpus` when `entries` is empty.
    pub fn from_entries(entries: Vec<CorpusEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(anyhow!(ChatError::EmptyCorpus));
        }
        let normalized_questions = entries
            .iter()
            .map(|entry| text::normalize(&entry.question))
            .collect();
        Ok(Self {
            entries,
            normalized_questions,
        })
    }

    /// Reads the corpus CSV at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let source = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| ChatError::CorpusRead {
            path: source.clone(),
            reason: e.to_string(),
        })?;
        let corpus = Self::from_reader(file, &source)?;
        info!("Loaded {} corpus entries from {}", corpus.len(), source);
        Ok(corpus)
    }

    /// Parses CSV from any reader. `source` names the input in error messages.
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| ChatError::CorpusRead {
                path: source.to_string(),
                reason: e.to_string(),
            })?
            .clone();
        let question_col = column_index(&headers, QUESTION_COLUMN, source)?;
        let answer_col = column_index(&headers, ANSWER_COLUMN, source)?;
        debug!(
            "Corpus columns: {}={}, {}={}",
            QUESTION_COLUMN, question_col, ANSWER_COLUMN, answer_col
        );

        let mut entries = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| ChatError::CorpusRead {
                path: source.to_string(),
                reason: e.to_string(),
            })?;
            // Header is line 1, so the first record is at least line 2.
            let line = record
                .position()
                .map(|pos| pos.line())
                .unwrap_or(row as u64 + 2);
            let question = required_field(&record, question_col, QUESTION_COLUMN, source, line)?;
            let answer = required_field(&record, answer_col, ANSWER_COLUMN, source, line)?;
            entries.push(CorpusEntry { question, answer });
        }

        Self::from_entries(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CorpusEntry> {
        self.entries.get(index)
    }

    /// Questions after normalization, aligned by index with the entries.
    pub fn normalized_questions(&self) -> &[String] {
        &self.normalized_questions
    }

    /// Index of the first entry whose normalized question equals `normalized_query`.
    pub fn find_exact(&self, normalized_query: &str) -> Option<usize> {
        self.normalized_questions
            .iter()
            .position(|question| question == normalized_query)
    }
}

fn column_index(headers: &csv::StringRecord, column: &str, source: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| {
            anyhow!(ChatError::MissingColumn {
                path: source.to_string(),
                column: column.to_string(),
            })
        })
}

fn required_field(
    record: &csv::StringRecord,
    column: usize,
    name: &str,
    source: &str,
    line: u64,
) -> Result<String> {
    match record.get(column) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(anyhow!(ChatError::MalformedRow {
            path: source.to_string(),
            line,
            field: name.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(csv: &str) -> Result<Corpus> {
        Corpus::from_reader(csv.as_bytes(), "test.csv")
    }

    fn chat_error(err: &anyhow::Error) -> &ChatError {
        err.downcast_ref::<ChatError>()
            .expect("expected a ChatError")
    }

    #[test]
    fn loads_rows_in_order() {
        let corpus = parse("Question,Answer\nhi,hello!\nbye,goodbye!\n").unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.entries()[0].answer, "hello!");
        assert_eq!(corpus.get(1).unwrap().question, "bye");
        assert!(corpus.get(2).is_none());
    }

    #[test]
    fn ignores_extra_columns_and_order() {
        let corpus = parse("Id,Answer,Question\n1,hello!,Hi There\n").unwrap();
        assert_eq!(corpus.entries()[0].question, "Hi There");
        assert_eq!(corpus.normalized_questions()[0], "hi there");
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let corpus = parse("Question,Answer\n\"where, exactly?\",\"here, there\"\n").unwrap();
        assert_eq!(corpus.entries()[0].answer, "here, there");
    }

    #[test]
    fn find_exact_returns_first_occurrence() {
        let corpus = parse("Question,Answer\nhi,first\nHI ,second\n").unwrap();
        assert_eq!(corpus.find_exact("hi"), Some(0));
        assert_eq!(corpus.find_exact("hello"), None);
    }

    #[test]
    fn missing_column_is_rejected() {
        let err = parse("Question,Reply\nhi,hello!\n").unwrap_err();
        assert!(matches!(
            chat_error(&err),
            ChatError::MissingColumn { column, .. } if column == "Answer"
        ));
    }

    #[test]
    fn short_row_is_rejected_with_line() {
        let err = parse("Question,Answer\nhi,hello!\nbye\n").unwrap_err();
        match chat_error(&err) {
            ChatError::MalformedRow { line, field, .. } => {
                assert_eq!(*line, 3);
                assert_eq!(field, "Answer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_question_is_rejected() {
        let err = parse("Question,Answer\n  ,hello!\n").unwrap_err();
        assert!(matches!(
            chat_error(&err),
            ChatError::MalformedRow { field, .. } if field == "Question"
        ));
    }

    #[test]
    fn header_only_file_is_empty_corpus() {
        let err = parse("Question,Answer\n").unwrap_err();
        assert!(matches!(chat_error(&err), ChatError::EmptyCorpus));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("chat_data.csv");
        fs::write(&path, "Question,Answer\nhi,hello!\n").unwrap();

        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn load_missing_file_fails() {
        let temp_dir = tempdir().unwrap();
        let err = Corpus::load(&temp_dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(chat_error(&err), ChatError::CorpusRead { .. }));
    }
}

//! # ChatMind Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout ChatMind. Errors fall
//! into three groups:
//!
//! - **Startup errors** (`Config`, `CorpusRead`, `MissingColumn`, `MalformedRow`,
//!   `EmptyCorpus`): fatal. The process refuses to start and `main` prints the
//!   message before exiting with status 1.
//! - **External service errors** (`ExternalService`, `Http`): produced inside the
//!   weather and encyclopedia collaborators. They never leave the collaborator;
//!   each lookup converts them into a `LookupOutcome::Unavailable`.
//! - A low similarity score is *not* an error. The router answers it with a
//!   fixed fallback message.
//!
//! ## Architecture
//!
//! - `ChatError`: a custom error enum derived with `thiserror`
//! - `Result<T>`: a type alias for `anyhow::Result<T>` so callers can attach
//!   context with `.with_context(..)` and still downcast to `ChatError`
//!
//! ## Examples
//!
//! ```rust
//! if entries.is_empty() {
//!     return Err(ChatError::EmptyCorpus.into());
//! }
//!
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<ChatError>(), Some(ChatError::MissingColumn { .. })) => {
//!         eprintln!("Fix the CSV header and try again.");
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for ChatMind.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read corpus '{path}': {reason}")]
    CorpusRead { path: String, reason: String },

    #[error("Corpus '{path}' is missing the required '{column}' column.")]
    MissingColumn { path: String, column: String },

    #[error("Corpus '{path}' line {line}: missing '{field}' value.")]
    MalformedRow {
        path: String,
        line: u64,
        field: String,
    },

    #[error("Corpus is empty: no vocabulary can be built.")]
    EmptyCorpus,

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

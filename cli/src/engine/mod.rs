//! # ChatMind Matching Engine
//!
//! File: cli/src/engine/mod.rs
//!
//! ## Overview
//!
//! Everything needed to turn the curated corpus into answers by similarity:
//!
//! - `corpus`: loads the Question/Answer CSV into an immutable `Corpus`
//! - `text`: the normalization and tokenization rules shared by corpus and queries
//! - `vector_space`: fits the TF-IDF `VectorSpaceModel` and builds the `CorpusMatrix`
//! - `matcher`: the `Matcher` that scores a query against every corpus row
//!
//! The engine is built once at startup and is read-only afterwards, so it can
//! be shared across request handlers without locking.
//!
pub mod corpus;
pub mod matcher;
pub mod text;
pub mod vector_space;

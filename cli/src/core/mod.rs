//! # ChatMind Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by every command:
//! - `config`: configuration loading, layering, and validation
//! - `error`: the `ChatError` type and the crate-wide `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config::{self, Overrides};
//! use crate::core::error::{ChatError, Result};
//! ```
//!
pub mod config;
pub mod error;

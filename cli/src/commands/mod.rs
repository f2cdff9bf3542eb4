//! # ChatMind Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the ChatMind CLI and the
//! options they share.
//!
//! ## Command Groups
//!
//! - `serve`: the HTTP front door (chat page, `/get`, `/history`, `/clear_history`)
//! - `ask`: answer a single message and exit
//! - `chat`: interactive terminal conversation
//!
//! Every command builds the same responder from the layered configuration.
//! `ResponderArgs` carries the options that shape it and is flattened into
//! each command's own argument struct.
//!
use crate::core::config::{self, Config, Overrides};
use crate::core::error::Result;
use clap::Args;
use std::path::PathBuf;

/// Answers one message (`chatmind ask`).
pub mod ask;
/// Interactive REPL (`chatmind chat`).
pub mod chat;
/// HTTP server (`chatmind serve`). Includes routes and server logic.
pub mod serve;

/// Options shared by every command that builds a responder.
#[derive(Args, Debug, Clone, Default)]
pub struct ResponderArgs {
    /// Path to the Question/Answer CSV corpus.
    #[arg(long, value_name = "PATH")]
    pub corpus: Option<PathBuf>,

    /// Minimum similarity score (0.0 to 1.0) for a corpus answer to be used.
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Number of previous user messages folded into similarity matching.
    #[arg(long, value_name = "K")]
    pub context: Option<usize>,

    /// OpenWeatherMap API key used for weather questions.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: Option<String>,
}

impl ResponderArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            corpus: self.corpus.clone(),
            confidence_threshold: self.threshold,
            context_window: self.context,
            weather_api_key: self.weather_api_key.clone(),
            ..Overrides::default()
        }
    }

    /// Loads the layered configuration with these options on top.
    pub fn load_config(&self) -> Result<Config> {
        config::load_config(&self.overrides())
    }
}

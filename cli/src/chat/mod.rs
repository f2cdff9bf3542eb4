//! # ChatMind Conversation Layer
//!
//! File: cli/src/chat/mod.rs
//!
//! ## Overview
//!
//! Everything between "a message arrived" and "here is the reply":
//!
//! - `history`: the shared, thread-safe conversation log
//! - `intents`: rule-based detection of exact, keyword, weather, and topic questions
//! - `router`: the responder that dispatches on the detected intent
//!
//! `build_responder` wires the production responder from a loaded `Config`.
//! The same instance is shared by every command (`serve`, `ask`, `chat`).
//!
use crate::core::config::Config;
use crate::core::error::Result;
use crate::engine::corpus::Corpus;
use crate::lookups::{self, OpenWeather, Wikipedia};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

pub mod history;
pub mod intents;
pub mod router;

pub use history::ConversationLog;
pub use router::{IntentRouter, RouterSettings};

/// The responder used outside of tests.
pub type Responder = IntentRouter<OpenWeather, Wikipedia>;

/// Loads the corpus, fits the matcher, and connects the real lookups.
pub fn build_responder(config: &Config) -> Result<Responder> {
    let corpus_path = config.corpus.path();
    info!("Loading corpus from {}", corpus_path.display());
    let corpus = Corpus::load(&corpus_path)?;

    let client = lookups::http_client(config.lookups.timeout())?;
    if config.weather.api_key.is_none() {
        info!("No OpenWeather API key configured; weather questions will explain how to set one");
    }
    let weather = OpenWeather::new(client.clone(), &config.weather);
    let topics = Wikipedia::new(client, &config.topics);

    IntentRouter::new(
        corpus,
        config.replies.clone(),
        RouterSettings::from(config),
        weather,
        topics,
        Arc::new(ConversationLog::new()),
    )
    .with_context(|| format!("Failed to build responder from {}", corpus_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ChatError;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn builds_from_csv_on_disk() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("chat_data.csv");
        fs::write(&csv, "Question,Answer\nhi,hello!\nbye,goodbye!\n").unwrap();

        let mut config = Config::default();
        config.corpus.path = csv.to_string_lossy().into_owned();
        let responder = build_responder(&config).unwrap();

        assert_eq!(responder.corpus().len(), 2);
        assert_eq!(responder.respond("Bye").await, "goodbye!");
        assert_eq!(responder.log().len(), 2);
    }

    #[test]
    fn missing_corpus_is_a_corpus_error() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.corpus.path = dir
            .path()
            .join("absent.csv")
            .to_string_lossy()
            .into_owned();

        let err = build_responder(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ChatError>(),
            Some(ChatError::CorpusRead { .. })
        ));
    }
}

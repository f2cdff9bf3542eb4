//! # ChatMind Conversation Log
//!
//! File: cli/src/chat/history.rs
//!
//! ## Overview
//!
//! The in-memory record of every exchange since the process started (or since
//! the last clear). It is shared by all request handlers, so every mutation
//! goes through a mutex. A user turn and the bot turn answering it are
//! appended under one lock acquisition and always sit next to each other.
//!
//! Serialized as `{"speaker": "You" | "ChatMind", "msg": "..."}` for the
//! `/history` endpoint.
//!
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "You")]
    User,
    #[serde(rename = "ChatMind")]
    Bot,
}

/// One message in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    #[serde(rename = "msg")]
    pub message: String,
}

impl Turn {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            message: message.into(),
        }
    }

    pub fn bot(message: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            message: message.into(),
        }
    }
}

/// Append-only, clearable, thread-safe list of turns.
#[derive(Debug, Default)]
pub struct ConversationLog {
    turns: Mutex<Vec<Turn>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the Vec half-written, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Vec<Turn>> {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a user message and the reply to it as one adjacent pair.
    pub fn record_exchange(&self, user_message: &str, bot_reply: &str) {
        let mut turns = self.lock();
        turns.push(Turn::user(user_message));
        turns.push(Turn::bot(bot_reply));
    }

    /// The last `limit` user messages, oldest first.
    pub fn recent_user_messages(&self, limit: usize) -> Vec<String> {
        if limit == 0 {
            return Vec::new();
        }
        let turns = self.lock();
        let mut recent: Vec<String> = turns
            .iter()
            .rev()
            .filter(|turn| turn.speaker == Speaker::User)
            .take(limit)
            .map(|turn| turn.message.clone())
            .collect();
        recent.reverse();
        recent
    }

    /// A copy of every turn, in order.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

//! # ChatMind Intent Router
//!
//! File: cli/src/chat/router.rs
//!
//! ## Overview
//!
//! Turns one user message into one reply. The router owns everything a reply
//! can depend on: the corpus, the fitted matcher, the keyword replies, the two
//! external lookups, and the conversation log.
//!
//! ## Flow
//!
//! 1. `intents::classify` picks the intent (exact, keyword, weather, topic, or similarity).
//! 2. The matching handler produces the reply. Lookups are awaited; their
//!    outcomes are rendered into fixed user-facing strings.
//! 3. For similarity, the last `context_window` user messages are prepended to
//!    the input before matching. A best score below `confidence_threshold`
//!    yields the fallback message instead of a weak answer.
//! 4. The user turn and the reply are appended to the log as one pair.
//!
//! Every branch produces a string; nothing here returns an error once the
//! router has been built.
//!
use super::history::ConversationLog;
use super::intents::{self, Intent, IntentRules};
use crate::core::config::{Config, KeywordReply};
use crate::core::error::Result;
use crate::engine::corpus::Corpus;
use crate::engine::matcher::Matcher;
use crate::lookups::{LookupOutcome, TopicLookup, WeatherLookup};
use std::sync::Arc;
use tracing::{debug, info};

pub const FALLBACK_REPLY: &str = "Sorry, I don't know that yet. You can ask me about weather \
     (e.g., 'Weather in Hyderabad') or ask 'Who is ...' for Wikipedia info.";
pub const CITY_PROMPT: &str = "Which city? (e.g., 'Weather in Hyderabad')";
pub const TOPIC_PROMPT: &str = "Please tell me the topic name (e.g., 'Who is APJ Abdul Kalam').";
pub const WEATHER_NOT_CONFIGURED: &str =
    "Weather feature requires OpenWeather API key. Set OPENWEATHER_API_KEY environment variable.";
pub const CITY_NOT_FOUND: &str = "City not found.";
pub const WEATHER_UNAVAILABLE: &str = "Sorry, couldn't fetch weather right now.";
pub const TOPIC_NOT_FOUND: &str = "Sorry, I couldn't find info on that topic.";

/// Matching knobs, usually taken from `Config::matcher`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterSettings {
    pub confidence_threshold: f64,
    pub context_window: usize,
}

impl From<&Config> for RouterSettings {
    fn from(config: &Config) -> Self {
        Self {
            confidence_threshold: config.matcher.confidence_threshold,
            context_window: config.matcher.context_window,
        }
    }
}

/// The responder: intent detection in front of the similarity matcher.
pub struct IntentRouter<W, T> {
    corpus: Corpus,
    matcher: Matcher,
    replies: Vec<KeywordReply>,
    settings: RouterSettings,
    weather: W,
    topics: T,
    log: Arc<ConversationLog>,
}

impl<W: WeatherLookup, T: TopicLookup> IntentRouter<W, T> {
    /// Fits the matcher on `corpus` and assembles the router.
    pub fn new(
        corpus: Corpus,
        replies: Vec<KeywordReply>,
        settings: RouterSettings,
        weather: W,
        topics: T,
        log: Arc<ConversationLog>,
    ) -> Result<Self> {
        let matcher = Matcher::fit(&corpus)?;
        info!(
            "Router ready: {} corpus entries, {} terms, {} keyword replies",
            corpus.len(),
            matcher.model().dimensions(),
            replies.len()
        );
        Ok(Self {
            corpus,
            matcher,
            replies,
            settings,
            weather,
            topics,
            log,
        })
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Answers `input` and records the exchange.
    pub async fn respond(&self, input: &str) -> String {
        let input = input.trim();
        let intent = intents::classify(
            &IntentRules {
                corpus: &self.corpus,
                replies: &self.replies,
            },
            input,
        );

        let reply = match intent {
            Intent::Exact { index } => self.answer_at(index),
            Intent::Keyword { index } => self.replies[index].reply.clone(),
            Intent::Weather { city: Some(city) } => {
                render_weather(self.weather.current(&city).await)
            }
            Intent::Weather { city: None } => CITY_PROMPT.to_string(),
            Intent::Topic { topic: Some(topic) } => {
                render_topic(self.topics.summary(&topic).await)
            }
            Intent::Topic { topic: None } => TOPIC_PROMPT.to_string(),
            Intent::Similarity => self.answer_by_similarity(input),
        };

        self.log.record_exchange(input, &reply);
        reply
    }

    fn answer_by_similarity(&self, input: &str) -> String {
        let mut context = self
            .log
            .recent_user_messages(self.settings.context_window);
        context.push(input.to_string());
        let query = context.join(" ");

        let found = self.matcher.best_match(&query);
        debug!(
            "Best match for {:?}: index {} score {:.3}",
            query, found.index, found.score
        );
        // A zero score means no shared terms, whatever the threshold says.
        if found.score <= 0.0 || found.score < self.settings.confidence_threshold {
            debug!(
                "Score below threshold {}, using fallback reply",
                self.settings.confidence_threshold
            );
            return FALLBACK_REPLY.to_string();
        }
        self.answer_at(found.index)
    }

    fn answer_at(&self, index: usize) -> String {
        self.corpus
            .get(index)
            .map(|entry| entry.answer.clone())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

fn render_weather(outcome: LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Found(summary) => summary,
        LookupOutcome::NotFound => CITY_NOT_FOUND.to_string(),
        LookupOutcome::Unavailable => WEATHER_UNAVAILABLE.to_string(),
        LookupOutcome::NotConfigured => WEATHER_NOT_CONFIGURED.to_string(),
    }
}

fn render_topic(outcome: LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Found(summary) => summary,
        LookupOutcome::NotFound | LookupOutcome::Unavailable | LookupOutcome::NotConfigured => {
            TOPIC_NOT_FOUND.to_string()
        }
    }
}

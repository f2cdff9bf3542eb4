//! # ChatMind Intent Detection
//!
//! File: cli/src/chat/intents.rs
//!
//! ## Overview
//!
//! Decides what kind of message the user sent before anything is looked up.
//! Detectors are pure functions tried in a fixed priority order; the first one
//! that recognizes the input wins, and input nobody recognizes goes to the
//! similarity matcher.
//!
//! | Priority | Detector  | Recognizes                                                      |
//! |----------|-----------|-----------------------------------------------------------------|
//! | 1        | `exact`   | input equal (after normalization) to a corpus question          |
//! | 2        | `keyword` | input containing a configured reply keyword                     |
//! | 3        | `weather` | input containing `weather`, `temperature` or `rain`             |
//! | 4        | `topic`   | input starting with `who is`/`what is`, or containing `tell me about`/`wikipedia` |
//!
//! ## City Heuristic
//!
//! The city is whatever follows the last ` in ` (cut at the first `?`), or
//! the last word when there is no ` in `. Multi-word cities without ` in `
//! lose all but their last word, and any message containing "rain" (including
//! "train") counts as a weather question. Both are long-standing behavior.
//!
use crate::core::config::KeywordReply;
use crate::engine::corpus::Corpus;
use crate::engine::text;
use tracing::debug;

const WEATHER_TRIGGERS: &[&str] = &["weather", "temperature", "rain"];
const TOPIC_PREFIXES: &[&str] = &["who is", "what is"];
const TOPIC_MARKERS: &[&str] = &["tell me about", "wikipedia"];

/// The recognized kind of an input, with whatever the detector extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Index of the corpus entry whose question the input equals.
    Exact { index: usize },
    /// Index into the configured keyword replies.
    Keyword { index: usize },
    /// `None` when no city could be extracted.
    Weather { city: Option<String> },
    /// `None` when nothing is left after removing the trigger phrases.
    Topic { topic: Option<String> },
    /// Nothing matched; answer by similarity.
    Similarity,
}

/// Data the detectors consult.
#[derive(Debug, Clone, Copy)]
pub struct IntentRules<'a> {
    pub corpus: &'a Corpus,
    pub replies: &'a [KeywordReply],
}

/// Signature shared by every detector: rules, trimmed input, normalized input.
type Detector = fn(&IntentRules<'_>, &str, &str) -> Option<Intent>;

/// Detectors in priority order.
const DETECTORS: [(&str, Detector); 4] = [
    ("exact", detect_exact),
    ("keyword", detect_keyword),
    ("weather", detect_weather),
    ("topic", detect_topic),
];

/// Classifies `input`, returning the first detector's verdict or `Intent::Similarity`.
pub fn classify(rules: &IntentRules<'_>, input: &str) -> Intent {
    let input = input.trim();
    let normalized = text::normalize(input);
    for (name, detect) in DETECTORS {
        if let Some(intent) = detect(rules, input, &normalized) {
            debug!("Input matched '{}' intent: {:?}", name, intent);
            return intent;
        }
    }
    Intent::Similarity
}

fn detect_exact(rules: &IntentRules<'_>, _input: &str, normalized: &str) -> Option<Intent> {
    rules
        .corpus
        .find_exact(normalized)
        .map(|index| Intent::Exact { index })
}

fn detect_keyword(rules: &IntentRules<'_>, _input: &str, normalized: &str) -> Option<Intent> {
    rules
        .replies
        .iter()
        .position(|reply| normalized.contains(&reply.keyword.trim().to_lowercase()))
        .map(|index| Intent::Keyword { index })
}

fn detect_weather(_rules: &IntentRules<'_>, _input: &str, normalized: &str) -> Option<Intent> {
    if !WEATHER_TRIGGERS
        .iter()
        .any(|trigger| normalized.contains(trigger))
    {
        return None;
    }
    Some(Intent::Weather {
        city: extract_city(normalized),
    })
}

fn detect_topic(_rules: &IntentRules<'_>, input: &str, normalized: &str) -> Option<Intent> {
    let triggered = TOPIC_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
        || TOPIC_MARKERS.iter().any(|marker| normalized.contains(marker));
    if !triggered {
        return None;
    }
    Some(Intent::Topic {
        topic: extract_topic(input),
    })
}

/// Pulls a city out of normalized weather input.
pub fn extract_city(normalized: &str) -> Option<String> {
    let candidate = match normalized.rsplit_once(" in ") {
        Some((_, after)) => after.trim().split('?').next().unwrap_or_default(),
        None => normalized.split_whitespace().last().unwrap_or_default(),
    };
    let candidate = candidate.trim();
    (!candidate.is_empty()).then(|| candidate.to_string())
}

/// Removes every topic trigger phrase (ignoring ASCII case), collapses the
/// remaining whitespace, and drops a trailing `?`. Keeps the user's casing.
pub fn extract_topic(input: &str) -> Option<String> {
    let mut remaining = input.to_string();
    for phrase in TOPIC_PREFIXES.iter().chain(TOPIC_MARKERS) {
        remaining = remove_phrase(&remaining, phrase);
    }
    let topic = remaining
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let topic = topic.trim_end_matches('?').trim_end();
    (!topic.is_empty()).then(|| topic.to_string())
}

// `phrase` is lower-case ASCII, so ASCII lower-casing keeps byte offsets aligned with `text`.
fn remove_phrase(text: &str, phrase: &str) -> String {
    let lowered = text.to_ascii_lowercase();
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(offset) = lowered[cursor..].find(phrase) {
        let start = cursor + offset;
        result.push_str(&text[cursor..start]);
        cursor = start + phrase.len();
    }
    result.push_str(&text[cursor..]);
    result
}

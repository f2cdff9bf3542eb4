//! # ChatMind Topic Lookup
//!
//! File: cli/src/lookups/topics.rs
//!
//! ## Overview
//!
//! Answers "who is / what is / tell me about" questions with the opening
//! sentences of the matching Wikipedia article.
//!
//! 1. The topic is searched with MediaWiki `opensearch`, which tolerates
//!    lower case, redirects and close spellings. The top hit is the page title.
//! 2. That title (whitespace collapsed to `_`, first letter upper-cased) is
//!    fetched from the REST `page/summary/{title}` endpoint.
//!
//! - No search hits, HTTP 404, disambiguation pages, and empty extracts → `NotFound`.
//! - Anything else that goes wrong → `Unavailable` (logged at WARN).
//!
use super::{LookupOutcome, TopicLookup};
use crate::core::config::TopicsConfig;
use crate::core::error::{ChatError, Result};
use anyhow::Context;
use reqwest::{Client, StatusCode, Url};
use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::{debug, warn};

/// Wikipedia page-summary client.
#[derive(Debug, Clone)]
pub struct Wikipedia {
    client: Client,
    endpoint: String,
    search_endpoint: String,
    sentences: usize,
}

/// `opensearch` answers `[query, [titles], [descriptions], [urls]]`.
type SearchResults = (IgnoredAny, Vec<String>, IgnoredAny, IgnoredAny);

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

impl Wikipedia {
    pub fn new(client: Client, config: &TopicsConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            search_endpoint: config.search_endpoint.clone(),
            sentences: config.sentences,
        }
    }

    fn page_url(&self, topic: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid topics endpoint '{}'", self.endpoint))?;
        url.path_segments_mut()
            .map_err(|_| {
                ChatError::ExternalService(format!(
                    "Topics endpoint '{}' cannot take a path",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .push(&page_title(topic));
        Ok(url)
    }

    /// The best-matching page title for `topic`, or `None` when the search has no hits.
    async fn resolve_title(&self, topic: &str) -> Result<Option<String>> {
        debug!("Searching page titles for '{}' at {}", topic, self.search_endpoint);
        let (_, titles, _, _): SearchResults = self
            .client
            .get(&self.search_endpoint)
            .query(&[
                ("action", "opensearch"),
                ("search", topic),
                ("limit", "1"),
                ("namespace", "0"),
                ("redirects", "resolve"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(ChatError::from)?
            .error_for_status()
            .map_err(ChatError::from)?
            .json()
            .await
            .context("Title search was not the expected JSON")?;
        Ok(titles.into_iter().find(|title| !title.trim().is_empty()))
    }

    async fn fetch(&self, topic: &str) -> Result<LookupOutcome> {
        let Some(title) = self.resolve_title(topic).await? else {
            debug!("No page matches '{}'", topic);
            return Ok(LookupOutcome::NotFound);
        };
        let url = self.page_url(&title)?;
        debug!("Requesting topic summary from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ChatError::from)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(LookupOutcome::NotFound);
        }
        let page: PageSummary = response
            .error_for_status()
            .map_err(ChatError::from)?
            .json()
            .await
            .context("Topic summary was not the expected JSON")?;
        Ok(summarize(page, self.sentences))
    }
}

impl TopicLookup for Wikipedia {
    async fn summary(&self, topic: &str) -> LookupOutcome {
        match self.fetch(topic).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Topic lookup for '{}' failed: {:#}", topic, e);
                LookupOutcome::Unavailable
            }
        }
    }
}

fn summarize(page: PageSummary, sentences: usize) -> LookupOutcome {
    if page.kind == "disambiguation" {
        debug!("Topic resolved to a disambiguation page");
        return LookupOutcome::NotFound;
    }
    let summary = first_sentences(&page.extract, sentences);
    if summary.is_empty() {
        LookupOutcome::NotFound
    } else {
        LookupOutcome::Found(summary)
    }
}

fn page_title(topic: &str) -> String {
    let joined = topic.split_whitespace().collect::<Vec<_>>().join("_");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The first `count` sentences of `text`. A sentence ends at `.`, `!` or `?`
/// followed by whitespace or the end of the text.
fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if at_boundary {
            seen += 1;
            if seen == count {
                return text[..index + c.len_utf8()].to_string();
            }
        }
    }
    text.to_string()
}

//! # ChatMind External Lookups
//!
//! File: cli/src/lookups/mod.rs
//!
//! ## Overview
//!
//! The two outbound collaborators the router can delegate to:
//!
//! - `weather`: current conditions for a city (OpenWeatherMap)
//! - `topics`: a short encyclopedia summary for a topic (Wikipedia)
//!
//! ## Contract
//!
//! A lookup never fails. Every transport error, unexpected status, timeout,
//! or malformed payload is logged and collapsed into
//! `LookupOutcome::Unavailable` before it leaves the collaborator, so the
//! router only ever renders one of four outcomes into a user-facing string.
//!
//! The traits are the seam the router is generic over; tests substitute
//! in-memory implementations.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::future::Future;
use std::time::Duration;

pub mod topics;
pub mod weather;

pub use topics::Wikipedia;
pub use weather::OpenWeather;

/// What a lookup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// A ready-to-show summary.
    Found(String),
    /// The service answered, but knows nothing about the request.
    NotFound,
    /// Network, status, timeout, or parse failure.
    Unavailable,
    /// A required credential is missing; no request was made.
    NotConfigured,
}

/// Current weather for a city.
pub trait WeatherLookup: Send + Sync {
    fn current(&self, city: &str) -> impl Future<Output = LookupOutcome> + Send;
}

/// Short summary of a topic.
pub trait TopicLookup: Send + Sync {
    fn summary(&self, topic: &str) -> impl Future<Output = LookupOutcome> + Send;
}

/// Builds the HTTP client shared by both lookups. Every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("chatmind/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client for external lookups")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_client_builds() {
        assert!(http_client(Duration::from_secs(6)).is_ok());
    }
}

//! # ChatMind Weather Lookup
//!
//! File: cli/src/lookups/weather.rs
//!
//! ## Overview
//!
//! Fetches current conditions from the OpenWeatherMap "current weather" API
//! and turns them into one line, e.g. `Paris weather: light rain, 14.2°C`.
//!
//! - No API key configured → `NotConfigured`, and no request is made.
//! - HTTP 404 (unknown city) → `NotFound`.
//! - Anything else that goes wrong → `Unavailable` (logged at WARN).
//!
use super::{LookupOutcome, WeatherLookup};
use crate::core::config::WeatherConfig;
use crate::core::error::{ChatError, Result};
use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

/// OpenWeatherMap client.
#[derive(Debug, Clone)]
pub struct OpenWeather {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    units: String,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    weather: Vec<Condition>,
    main: Readings,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Readings {
    temp: f64,
}

impl OpenWeather {
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
        }
    }

    async fn fetch(&self, api_key: &str, city: &str) -> Result<LookupOutcome> {
        debug!("Requesting weather for '{}' from {}", city, self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", api_key), ("units", self.units.as_str())])
            .send()
            .await
            .map_err(ChatError::from)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(LookupOutcome::NotFound);
        }
        let body: WeatherResponse = response
            .error_for_status()
            .map_err(ChatError::from)?
            .json()
            .await
            .context("Weather response was not the expected JSON")?;

        let condition = body.weather.first().ok_or_else(|| {
            ChatError::ExternalService("Weather response had no conditions".to_string())
        })?;
        Ok(LookupOutcome::Found(format_report(
            city,
            &condition.description,
            body.main.temp,
            &self.units,
        )))
    }
}

impl WeatherLookup for OpenWeather {
    async fn current(&self, city: &str) -> LookupOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("Weather lookup skipped: no API key configured");
            return LookupOutcome::NotConfigured;
        };
        match self.fetch(api_key, city).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Weather lookup for '{}' failed: {:#}", city, e);
                LookupOutcome::Unavailable
            }
        }
    }
}

fn format_report(city: &str, description: &str, temp: f64, units: &str) -> String {
    let symbol = match units {
        "imperial" => "°F",
        "standard" => " K",
        _ => "°C",
    };
    format!("{} weather: {}, {}{}", title_case(city), description, temp, symbol)
}

/// Upper-cases the first letter of every whitespace-separated word.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookups::http_client;
    use axum::extract::Query;
    use axum::http::StatusCode as HttpStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::net::TcpListener;

    /// Serves a fake OpenWeatherMap endpoint on an ephemeral port and returns its URL.
    async fn fake_provider() -> String {
        async fn weather(Query(params): Query<HashMap<String, String>>) -> axum::response::Response {
            match params.get("q").map(String::as_str) {
                Some("paris") => Json(serde_json::json!({
                    "weather": [{ "description": "light rain" }],
                    "main": { "temp": 14.5 }
                }))
                .into_response(),
                Some("garbled") => (HttpStatus::OK, "not json").into_response(),
                Some("broken") => HttpStatus::INTERNAL_SERVER_ERROR.into_response(),
                _ => HttpStatus::NOT_FOUND.into_response(),
            }
        }

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/weather", get(weather)))
                .await
                .unwrap();
        });
        format!("http://{}/weather", addr)
    }

    fn lookup(endpoint: String, api_key: Option<&str>) -> OpenWeather {
        let config = WeatherConfig {
            api_key: api_key.map(str::to_string),
            endpoint,
            units: "metric".to_string(),
        };
        OpenWeather::new(http_client(Duration::from_secs(6)).unwrap(), &config)
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("paris"), "Paris");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn report_uses_unit_symbol() {
        assert_eq!(
            format_report("paris", "clear sky", 21.0, "metric"),
            "Paris weather: clear sky, 21°C"
        );
        assert_eq!(
            format_report("austin", "haze", 88.5, "imperial"),
            "Austin weather: haze, 88.5°F"
        );
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let weather = lookup("http://127.0.0.1:1/weather".to_string(), None);
        assert_eq!(weather.current("paris").await, LookupOutcome::NotConfigured);
    }

    #[tokio::test]
    async fn found_city_is_summarized() {
        let weather = lookup(fake_provider().await, Some("key"));
        assert_eq!(
            weather.current("paris").await,
            LookupOutcome::Found("Paris weather: light rain, 14.5°C".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_city_is_not_found() {
        let weather = lookup(fake_provider().await, Some("key"));
        assert_eq!(weather.current("atlantis").await, LookupOutcome::NotFound);
    }

    #[tokio::test]
    async fn failures_collapse_to_unavailable() {
        let endpoint = fake_provider().await;
        let weather = lookup(endpoint, Some("key"));
        assert_eq!(weather.current("garbled").await, LookupOutcome::Unavailable);
        assert_eq!(weather.current("broken").await, LookupOutcome::Unavailable);

        // Nothing listens on port 1.
        let offline = lookup("http://127.0.0.1:1/weather".to_string(), Some("key"));
        assert_eq!(offline.current("paris").await, LookupOutcome::Unavailable);
    }
}

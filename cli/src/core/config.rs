//! # ChatMind Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges, and validates the settings that shape the
//! responder: where the corpus lives, how strict the similarity matcher is,
//! how the outbound lookups are reached, and where the HTTP front door binds.
//!
//! ## Architecture
//!
//! Configuration sources, lowest precedence first:
//! 1. Default values defined in the code
//! 2. User-specific `config.toml` in the platform config dir (e.g. `~/.config/chatmind/`)
//! 3. Project-specific `.chatmind.toml` in the current directory or an ancestor
//! 4. Command-line flags and environment variables (`Overrides`)
//!
//! Each file is parsed into a raw TOML table first. Tables are merged key by key
//! (nested tables recursively, everything else replaced), then the result is
//! deserialized into `Config`. A relative `corpus.path` inside a file is
//! anchored to that file's directory before merging.
//!
//! ## Examples
//!
//! ```toml
//! [corpus]
//! path = "data/chat_data.csv"
//!
//! [matcher]
//! confidence_threshold = 0.15
//! context_window = 2
//!
//! [weather]
//! api_key = "..."
//!
//! [[replies]]
//! keyword = "aiml"
//! reply = "AIML stands for Artificial Intelligence and Machine Learning."
//! ```
//!
//! ```rust
//! let cfg = config::load_config(&Overrides::default())?;
//! let corpus_path = cfg.corpus.path();
//! let timeout = cfg.lookups.timeout();
//! ```
//!
use crate::core::error::{ChatError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Name of the project-level configuration file.
pub const PROJECT_CONFIG_FILENAME: &str = ".chatmind.toml";

/// The main configuration structure.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub matcher: MatcherConfig,
    pub lookups: LookupsConfig,
    pub weather: WeatherConfig,
    pub topics: TopicsConfig,
    pub server: ServerConfig,
    /// Fixed replies triggered by a keyword anywhere in the input.
    pub replies: Vec<KeywordReply>,
}

/// Location of the Question/Answer CSV file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct CorpusConfig {
    /// Path to the corpus (can use ~). Will be expanded.
    pub path: String,
}

/// Similarity matcher tuning.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct MatcherConfig {
    /// Scores strictly below this are answered with the fallback message.
    pub confidence_threshold: f64,
    /// How many previous user messages are prepended to the query.
    pub context_window: usize,
}

/// Settings shared by every outbound lookup.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct LookupsConfig {
    pub timeout_secs: u64,
}

/// OpenWeatherMap settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct WeatherConfig {
    /// API credential. Without it the weather intent answers "feature unavailable".
    pub api_key: Option<String>,
    pub endpoint: String,
    /// `metric`, `imperial` or `standard`.
    pub units: String,
}

/// Encyclopedia summary settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct TopicsConfig {
    /// Base URL of the page-summary endpoint; the page title is appended as a path segment.
    pub endpoint: String,
    /// MediaWiki `api.php` used to resolve a topic to its best-matching page title.
    pub search_endpoint: String,
    /// Number of sentences kept from the summary.
    pub sentences: usize,
}

/// HTTP front door settings (`chatmind serve`).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
}

/// A canned reply for any input containing `keyword`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct KeywordReply {
    pub keyword: String,
    pub reply: String,
}

/// Values supplied on the command line (or via environment) that win over every file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub corpus: Option<PathBuf>,
    pub confidence_threshold: Option<f64>,
    pub context_window: Option<usize>,
    pub weather_api_key: Option<String>,
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub disable_cors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig::default(),
            matcher: MatcherConfig::default(),
            lookups: LookupsConfig::default(),
            weather: WeatherConfig::default(),
            topics: TopicsConfig::default(),
            server: ServerConfig::default(),
            replies: default_replies(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: "chat_data.csv".to_string(),
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.1,
            context_window: 3,
        }
    }
}

impl Default for LookupsConfig {
    fn default() -> Self {
        Self { timeout_secs: 6 }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            units: "metric".to_string(),
        }
    }
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://en.wikipedia.org/api/rest_v1/page/summary".to_string(),
            search_endpoint: "https://en.wikipedia.org/w/api.php".to_string(),
            sentences: 2,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            enable_cors: true,
        }
    }
}

fn default_replies() -> Vec<KeywordReply> {
    vec![KeywordReply {
        keyword: "aiml".to_string(),
        reply: "AIML stands for Artificial Intelligence and Machine Learning. \
                AI means Artificial Intelligence, ML means Machine Learning."
            .to_string(),
    }]
}

impl CorpusConfig {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

impl LookupsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Applies command-line/environment values on top of the file configuration.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(path) = &overrides.corpus {
            self.corpus.path = path.to_string_lossy().into_owned();
        }
        if let Some(threshold) = overrides.confidence_threshold {
            self.matcher.confidence_threshold = threshold;
        }
        if let Some(window) = overrides.context_window {
            self.matcher.context_window = window;
        }
        if let Some(key) = &overrides.weather_api_key {
            self.weather.api_key = Some(key.clone());
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if overrides.disable_cors {
            self.server.enable_cors = false;
        }
        // A blank key is the same as no key.
        self.weather.api_key = self
            .weather
            .api_key
            .take()
            .filter(|key| !key.trim().is_empty());
    }
}

// --- Configuration Loading Functions ---

/// Loads the effective configuration: defaults, user file, project file, then `overrides`.
pub fn load_config(overrides: &Overrides) -> Result<Config> {
    let mut layers = Vec::new();
    if let Some(user_path) = user_config_path() {
        layers.push(user_path);
    }
    if let Some(project_path) = find_project_config_path()? {
        info!(
            "Loading project configuration from: {}",
            project_path.display()
        );
        layers.push(project_path);
    } else {
        debug!("No project configuration file (.chatmind.toml) found in current directory or ancestors.");
    }

    let mut config = load_layered(&layers)?;
    config.apply_overrides(overrides);
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("com", "ChatMind", "chatmind") else {
        warn!("Could not determine user config directory.");
        return None;
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        Some(config_path)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        None
    }
}

fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut path: &Path = &current_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Ok(Some(project_config));
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return Ok(None);
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => return Ok(None),
        }
    }
}

/// Merges the given files in order (later files win) over the defaults.
pub fn load_layered(paths: &[PathBuf]) -> Result<Config> {
    let mut merged = toml::Table::new();
    for path in paths {
        let mut table = read_table(path)?;
        anchor_corpus_path(&mut table, path);
        merge_tables(&mut merged, table);
    }
    toml::Value::Table(merged)
        .try_into()
        .context("Failed to interpret merged configuration")
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Resolves a relative `corpus.path` against the directory holding `config_path`.
fn anchor_corpus_path(table: &mut toml::Table, config_path: &Path) {
    let Some(toml::Value::Table(corpus)) = table.get_mut("corpus") else {
        return;
    };
    let Some(toml::Value::String(raw)) = corpus.get_mut("path") else {
        return;
    };
    if raw.starts_with('~') || Path::new(raw.as_str()).is_absolute() {
        return;
    }
    if let Some(parent) = config_path.parent() {
        let anchored = parent.join(raw.as_str());
        debug!(
            "Resolved relative corpus path from {} to: {}",
            config_path.display(),
            anchored.display()
        );
        *raw = anchored.to_string_lossy().into_owned();
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn expand_config_paths(config: &mut Config) {
    config.corpus.path = shellexpand::tilde(&config.corpus.path).into_owned();
    debug!("Expanded corpus path: {}", config.corpus.path);
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    let threshold = config.matcher.confidence_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(anyhow!(ChatError::Config(format!(
            "confidence_threshold must be between 0 and 1, got {}.",
            threshold
        ))));
    }
    if config.corpus.path.trim().is_empty() {
        return Err(anyhow!(ChatError::Config(
            "corpus.path cannot be empty.".to_string()
        )));
    }
    if config.lookups.timeout_secs == 0 {
        return Err(anyhow!(ChatError::Config(
            "lookups.timeout_secs must be greater than zero.".to_string()
        )));
    }
    if config.topics.sentences == 0 {
        return Err(anyhow!(ChatError::Config(
            "topics.sentences must be greater than zero.".to_string()
        )));
    }
    for (name, endpoint) in [
        ("weather.endpoint", &config.weather.endpoint),
        ("topics.endpoint", &config.topics.endpoint),
        ("topics.search_endpoint", &config.topics.search_endpoint),
    ] {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(anyhow!(ChatError::Config(format!(
                "{} must be an http(s) URL, got '{}'.",
                name, endpoint
            ))));
        }
    }
    if !matches!(
        config.weather.units.as_str(),
        "metric" | "imperial" | "standard"
    ) {
        return Err(anyhow!(ChatError::Config(format!(
            "Invalid weather.units '{}'. Expected metric, imperial or standard.",
            config.weather.units
        ))));
    }
    for reply in &config.replies {
        if reply.keyword.trim().is_empty() || reply.reply.trim().is_empty() {
            return Err(anyhow!(ChatError::Config(format!(
                "Keyword replies need both a keyword and a reply (keyword: '{}').",
                reply.keyword
            ))));
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}

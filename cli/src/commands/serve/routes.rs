//! # ChatMind HTTP Routes
//!
//! File: cli/src/commands/serve/routes.rs
//!
//! Request handlers. Each one gets the shared responder through axum `State`.
//! None of them can fail: replies are always strings and the log is always
//! serializable.
//!
use crate::chat::history::Turn;
use crate::chat::IntentRouter;
use crate::lookups::{TopicLookup, WeatherLookup};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// The chat page, compiled into the binary.
pub const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// Shared handler state.
pub type AppState<W, T> = Arc<IntentRouter<W, T>>;

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(default)]
    pub msg: String,
}

/// Body of `POST /clear_history`.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /get?msg=...`: the reply as plain text.
pub async fn get_reply<W, T>(
    State(router): State<AppState<W, T>>,
    Query(query): Query<MessageQuery>,
) -> String
where
    W: WeatherLookup + 'static,
    T: TopicLookup + 'static,
{
    debug!("Received message: {:?}", query.msg);
    router.respond(&query.msg).await
}

pub async fn history<W, T>(State(router): State<AppState<W, T>>) -> Json<Vec<Turn>>
where
    W: WeatherLookup + 'static,
    T: TopicLookup + 'static,
{
    Json(router.log().snapshot())
}

pub async fn clear_history<W, T>(State(router): State<AppState<W, T>>) -> Json<Ack>
where
    W: WeatherLookup + 'static,
    T: TopicLookup + 'static,
{
    let cleared = router.log().len();
    router.log().clear();
    info!("Conversation history cleared ({} turns)", cleared);
    Json(Ack { ok: true })
}

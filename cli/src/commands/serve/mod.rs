//! # ChatMind HTTP Front Door
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `chatmind serve` exposes the responder over HTTP for the bundled chat page
//! or any other client:
//!
//! | Method | Path             | Response                                 |
//! |--------|------------------|------------------------------------------|
//! | GET    | `/`              | the chat page (HTML)                     |
//! | GET    | `/get?msg=...`   | the reply, `text/plain`                  |
//! | GET    | `/history`       | JSON array of `{"speaker", "msg"}` turns |
//! | POST   | `/clear_history` | `{"ok": true}` after emptying the log    |
//!
//! ## Architecture
//!
//! - `routes.rs`: request handlers over a shared `Arc<IntentRouter>`
//! - `server_logic.rs`: router assembly, middleware, port fallback, graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the configured address (127.0.0.1:5000 by default)
//! chatmind serve
//!
//! # Bind to all interfaces on another port, with a different corpus
//! chatmind serve --host 0.0.0.0 --port 8080 --corpus data/faq.csv
//! ```
//!
use super::ResponderArgs;
use crate::chat;
use crate::core::error::Result;
use clap::Args;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::info;

pub mod routes;
pub mod server_logic;

/// Arguments for `chatmind serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on. If it is busy, the next free port is used.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Address to bind to. Use `0.0.0.0` to accept connections from other machines.
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Do not send CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    #[command(flatten)]
    pub responder: ResponderArgs,
}

/// Entry point for `chatmind serve`.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let mut overrides = args.responder.overrides();
    overrides.host = args.host;
    overrides.port = args.port;
    overrides.disable_cors = args.no_cors;

    let config = crate::core::config::load_config(&overrides)?;
    info!("Effective server config: {:?}", config.server);

    let responder = Arc::new(chat::build_responder(&config)?);
    server_logic::run_server(&config.server, responder).await
}

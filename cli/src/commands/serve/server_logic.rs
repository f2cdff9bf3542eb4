//! # ChatMind HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! Assembles the axum application and runs it:
//! - Route table over the shared responder (see `routes.rs`)
//! - Request tracing and optional permissive CORS
//! - Port availability checking with automatic fallback
//! - Graceful shutdown on Ctrl+C or SIGTERM
//!
//! ## Examples
//!
//! ```rust
//! let responder = Arc::new(chat::build_responder(&config)?);
//! server_logic::run_server(&config.server, responder).await?;
//! ```
//!
use super::routes;
use crate::chat::IntentRouter;
use crate::core::config::ServerConfig;
use crate::core::error::Result;
use crate::lookups::{TopicLookup, WeatherLookup};
use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// Number of consecutive ports tried before giving up.
const MAX_PORT_ATTEMPTS: u8 = 10;

/// # Run HTTP Server (`run_server`)
///
/// Binds the first free port at or after `config.port`, prints the address,
/// and serves until a shutdown signal arrives.
///
/// ## Errors
///
/// - No free port within `MAX_PORT_ATTEMPTS` tries.
/// - The listener cannot be bound, or the server fails while running.
pub async fn run_server<W, T>(config: &ServerConfig, responder: Arc<IntentRouter<W, T>>) -> Result<()>
where
    W: WeatherLookup + 'static,
    T: TopicLookup + 'static,
{
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    let corpus_size = responder.corpus().len();
    let app = create_app(config, responder);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;
    // Port 0 asks the OS for a port, so report what was actually bound.
    let bound = listener
        .local_addr()
        .context("Failed to read the bound server address")?;

    print_banner(bound, corpus_size, config.enable_cors);
    info!("Starting server on {}", bound);
    println!("Server starting! Press Ctrl+C to stop.");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

fn print_banner(bound: SocketAddr, corpus_size: usize, enable_cors: bool) {
    println!("\n=================================================================");
    println!("💬 ChatMind is listening");
    println!("🌐 Local URL:         {}", local_url(bound));
    println!("⚙️  Binding to address: {}", bound);
    println!("📚 Corpus entries:    {}", corpus_size);
    println!("🔒 CORS enabled:      {}", enable_cors);
    println!("=================================================================\n");
}

fn local_url(bound: SocketAddr) -> String {
    format!("http://localhost:{}", bound.port())
}

/// Resolves when Ctrl+C (or SIGTERM on Unix) is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port`, then each following port, up to `max_attempts` ports
/// in total. Returns the first address that could be bound.
async fn find_available_port(
    req_host: IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                let Some(next) = current_port.checked_add(1) else {
                    break;
                };
                current_port = next;
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// Builds the route table over `responder` and wraps it in tracing and CORS.
pub fn create_app<W, T>(config: &ServerConfig, responder: Arc<IntentRouter<W, T>>) -> Router
where
    W: WeatherLookup + 'static,
    T: TopicLookup + 'static,
{
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(routes::index))
        .route("/get", get(routes::get_reply::<W, T>))
        .route("/history", get(routes::history::<W, T>))
        .route("/clear_history", post(routes::clear_history::<W, T>))
        .with_state(responder)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer),
        )
}

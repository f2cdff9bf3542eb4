//! # ChatMind Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the ChatMind CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - `core`: configuration and error types
//! - `engine`: corpus loading, TF-IDF vectorization, similarity matching
//! - `lookups`: weather and encyclopedia collaborators
//! - `chat`: intent detection, the responder, the conversation log
//! - `commands`: `serve`, `ask`, and `chat`
//!
//! ## Examples
//!
//! ```bash
//! # Start the web chat on http://127.0.0.1:5000
//! chatmind serve
//!
//! # One question, with debug logging
//! chatmind -vv ask "what is your name"
//!
//! # Talk in the terminal
//! chatmind chat --corpus data/faq.csv
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to the command handler
//! 4. Format and display any errors that occur
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod chat;
mod commands;
mod core;
mod engine;
mod lookups;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "chatmind",
    about = "💬 ChatMind: a retrieval chatbot over a Question/Answer corpus",
    long_about = "Answers messages from a CSV corpus using TF-IDF similarity, with\n\
                  built-in weather and Wikipedia lookups. Serve it over HTTP, ask a\n\
                  single question, or chat in the terminal.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Serve the chat page and HTTP endpoints.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Answer one message and exit.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Chat interactively in the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

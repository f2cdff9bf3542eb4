//! # ChatMind Interactive Chat
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! A terminal conversation with the responder. Each line typed is one message.
//! Besides ordinary messages, the REPL understands:
//!
//! - `bye`: say goodbye and exit
//! - `/history`: print the conversation so far
//! - `/clear`: forget the conversation
//!
//! End of input (Ctrl+D) exits the same way as `bye`. Blank lines are ignored.
//!
use super::ResponderArgs;
use crate::chat::history::Speaker;
use crate::chat::{self, IntentRouter};
use crate::core::error::Result;
use crate::lookups::{TopicLookup, WeatherLookup};
use anyhow::Context;
use clap::Args;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

const GOODBYE: &str = "Goodbye!";

/// Arguments for `chatmind chat`.
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub responder: ResponderArgs,
}

pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    info!("Handling chat command with args: {:?}", args);
    let config = args.responder.load_config()?;
    let responder = chat::build_responder(&config)?;

    println!("Chat with ChatMind! Type 'bye' to quit, '/history' to review, '/clear' to start over.");
    let stdin = BufReader::new(tokio::io::stdin());
    run_repl(&responder, stdin, std::io::stdout()).await
}

/// Reads messages from `input` until `bye` or end of input, writing replies to `output`.
pub async fn run_repl<W, T, R, O>(
    router: &IntentRouter<W, T>,
    input: R,
    mut output: O,
) -> Result<()>
where
    W: WeatherLookup,
    T: TopicLookup,
    R: AsyncBufRead + Unpin,
    O: Write,
{
    let mut lines = input.lines();
    loop {
        write!(output, "You: ")?;
        output.flush().context("Failed to flush stdout")?;

        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
        else {
            writeln!(output)?;
            writeln!(output, "ChatMind: {}", GOODBYE)?;
            return Ok(());
        };

        let message = line.trim();
        match message {
            "" => continue,
            _ if message.eq_ignore_ascii_case("bye") => {
                writeln!(output, "ChatMind: {}", GOODBYE)?;
                return Ok(());
            }
            "/history" => {
                if router.log().is_empty() {
                    writeln!(output, "(no messages yet)")?;
                }
                for turn in router.log().snapshot() {
                    let speaker = match turn.speaker {
                        Speaker::User => "You",
                        Speaker::Bot => "ChatMind",
                    };
                    writeln!(output, "  {}: {}", speaker, turn.message)?;
                }
            }
            "/clear" => {
                let forgotten = router.log().len();
                router.log().clear();
                writeln!(output, "(history cleared, {} messages forgotten)", forgotten)?;
            }
            _ => {
                let reply = router.respond(message).await;
                writeln!(output, "ChatMind: {}", reply)?;
            }
        }
    }
}

//! # ChatMind Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! Answers one message and exits. The words given on the command line are
//! joined with single spaces, so quoting is optional:
//!
//! ```bash
//! chatmind ask who is Ada Lovelace
//! chatmind ask "weather in Hyderabad" --weather-api-key "$KEY"
//! ```
//!
use super::ResponderArgs;
use crate::chat;
use crate::core::error::Result;
use clap::Args;
use tracing::info;

/// Arguments for `chatmind ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The message to answer.
    #[arg(required = true, num_args = 1.., value_name = "MESSAGE")]
    pub message: Vec<String>,

    #[command(flatten)]
    pub responder: ResponderArgs,
}

impl AskArgs {
    fn message(&self) -> String {
        self.message.join(" ")
    }
}

pub async fn handle_ask(args: AskArgs) -> Result<()> {
    info!("Handling ask command with args: {:?}", args);
    let config = args.responder.load_config()?;
    let responder = chat::build_responder(&config)?;
    let reply = responder.respond(&args.message()).await;
    println!("{}", reply);
    Ok(())
}

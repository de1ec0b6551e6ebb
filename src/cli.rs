// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::chat::{ChatDispatcher, DISPATCH_APOLOGY};
use crate::core::ConfigManager;
use crate::types::ChatMessage;
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "hiring-chat")]
#[command(about = "Hiring assistant chat proxy for an LLM gateway")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve {
        /// Listen port, overrides PORT and the config file
        #[arg(long)]
        port: Option<u16>,
        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Chat with a running server from the terminal
    Chat {
        #[arg(long, default_value = "http://localhost:8000/api/chat")]
        endpoint: String,
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

pub async fn handle_command(command: Option<Command>) -> Result<()> {
    match command.unwrap_or(Command::Serve {
        port: None,
        config: None,
    }) {
        Command::Serve { port, config } => {
            let mut chat_config = ConfigManager::load(config.as_deref())?;
            if let Some(port) = port {
                chat_config.port = port;
            }
            start_web_server(chat_config).await
        }
        Command::Chat {
            endpoint,
            timeout_secs,
        } => run_chat_session(endpoint, Duration::from_secs(timeout_secs)).await,
    }
}

/// Interactive session; the transcript lives only in memory.
async fn run_chat_session(endpoint: String, timeout: Duration) -> Result<()> {
    let dispatcher = ChatDispatcher::new(endpoint, timeout)?;
    info!("Chatting with {}", dispatcher.endpoint());

    println!("Hiring assistant. Type /reset to start over, /quit to leave.");

    let mut transcript: Vec<ChatMessage> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                transcript.clear();
                println!("Conversation cleared.");
                continue;
            }
            _ => {}
        }

        transcript.push(ChatMessage::user(line));
        let reply = dispatcher.send(&transcript).await;
        println!("{}\n", reply);
        record_reply(&mut transcript, reply);
    }

    Ok(())
}

/// Keep the dispatcher's apology out of the conversation history; the unanswered
/// user turn is dropped too so the next attempt does not repeat it.
fn record_reply(transcript: &mut Vec<ChatMessage>, reply: String) {
    if reply == DISPATCH_APOLOGY {
        transcript.pop();
    } else {
        transcript.push(ChatMessage::assistant(reply));
    }
}

//! Interactive terminal chat with a persisted conversation.
//!
//! Set OPENROUTER_BASE_URL and OPENROUTER_API_KEY in your environment and run:
//!   cargo run --example chat -p unai
//!
//! History is kept under `$UNAI_STATE_DIR` (default `.unai`). Commands:
//! `/models`, `/model <id>`, `/reasoning`, `/clear`, `/quit`.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use unai::prelude::*;

const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer concisely.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let client = match OpenRouter::from_env() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Ok(());
        }
    };
    let state_dir = std::env::var("UNAI_STATE_DIR").unwrap_or_else(|_| ".unai".into());
    let mut session = ChatSession::restore(client, FsStore::new(state_dir))
        .await?
        .with_system_prompt(SYSTEM_PROMPT);

    for message in session.render(&PlainRenderer) {
        let marker = if message.error { " [failed]" } else { "" };
        println!("{}{marker}: {}", message.role, message.body);
    }
    println!("[model: {}]", session.model());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_reasoning: Option<String> = None;

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/models", _) => {
                for model in catalog() {
                    let marker = if model.id == session.model() { "*" } else { " " };
                    println!("{marker} {:<50} {}", model.id, model.display_name);
                }
            }
            ("/model", id) => match session.select_model(id).await {
                Ok(()) => println!("[model: {}]", session.model()),
                Err(err) => eprintln!("{err}"),
            },
            ("/reasoning", _) => match &last_reasoning {
                Some(reasoning) => println!("{reasoning}"),
                None => println!("[no reasoning in the last reply]"),
            },
            ("/clear", _) => {
                session.clear().await?;
                last_reasoning = None;
                println!("[history cleared]");
            }
            _ if line.is_empty() => {}
            _ => {
                let mut reasoning = ReasoningStream::new();
                let mut printed = String::new();
                let mut sink = |delta: &str| {
                    let split = reasoning.push(delta);
                    if let Some(new_text) = split.display.strip_prefix(printed.as_str()) {
                        print!("{new_text}");
                        let _ = std::io::stdout().flush();
                        printed = split.display;
                    }
                };

                let outcome = session.send(line, Some(&mut sink)).await;
                println!();

                let split = reasoning.finish();
                last_reasoning = split.reasoning.filter(|r| !r.is_empty());
                if last_reasoning.is_some() {
                    println!("[reasoning hidden, /reasoning to show]");
                }
                if let Err(err) = outcome {
                    eprintln!("{}", err.user_message());
                }
            }
        }
    }

    Ok(())
}

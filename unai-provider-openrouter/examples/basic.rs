//! Whole-shot completion against OpenRouter.
//!
//! Set OPENROUTER_BASE_URL and OPENROUTER_API_KEY in your environment and run:
//!   cargo run --example basic -p unai-provider-openrouter

use unai_provider_openrouter::{CompletionOptions, OpenRouter, Reply};
use unai_types::{DEFAULT_MODEL, Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = OpenRouter::from_env()?.options(CompletionOptions {
        max_tokens: Some(256),
        temperature: Some(0.7),
    });

    let history = vec![Message::system("You are a concise assistant.")];
    let reply = client
        .send(
            &history,
            Message::user("Say hello in one sentence."),
            DEFAULT_MODEL,
            None,
        )
        .await?;

    if let Reply::Message(message) = reply {
        println!("{}: {}", message.role, message.content);
    }

    Ok(())
}

//! Streaming example: print deltas as they arrive, stop on Ctrl-C.
//!
//! Set OPENROUTER_BASE_URL and OPENROUTER_API_KEY in your environment and run:
//!   cargo run --example streaming -p unai-provider-openrouter

use std::io::Write;

use futures::StreamExt;
use unai_provider_openrouter::{OpenRouter, StreamEvent};
use unai_types::{DEFAULT_MODEL, Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = OpenRouter::from_env()?;
    let request = client.request_builder().build(
        &[Message::system("You are a poet.")],
        Message::user("Write a haiku about Rust programming."),
        DEFAULT_MODEL,
        true,
    )?;

    let mut handle = client.complete_stream(request).await?;

    let cancel = handle.cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    while let Some(event) = handle.next().await {
        match event {
            Ok(StreamEvent::TextDelta(text)) => {
                print!("{text}");
                std::io::stdout().flush()?;
            }
            Ok(StreamEvent::Completed) => {
                println!();
                println!("Stream complete.");
            }
            Err(err) => {
                eprintln!("\nStream error: {}", err.user_message());
                break;
            }
        }
    }

    Ok(())
}

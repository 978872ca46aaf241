#![deny(missing_docs)]
//! OpenRouter Chat Completions client for unai.
//!
//! # Usage
//!
//! ```no_run
//! use unai_provider_openrouter::{OpenRouter, Reply};
//! use unai_types::Message;
//!
//! # async fn run() -> Result<(), unai_types::ChatError> {
//! let client = OpenRouter::from_env()?;
//! let history = vec![Message::system("You are helpful")];
//!
//! // Whole-shot
//! let reply = client.send(&history, Message::user("hi"), "m1", None).await?;
//!
//! // Streamed into a sink
//! let mut text = String::new();
//! let mut sink = |delta: &str| text.push_str(delta);
//! client.send(&history, Message::user("hi"), "m1", Some(&mut sink)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! The pieces are also usable on their own: [`RequestBuilder`] produces a
//! [`ChatRequest`], [`OpenRouter::complete`] executes a whole-shot request and
//! [`OpenRouter::complete_stream`] returns a cancellable
//! [`StreamHandle`](unai_types::StreamHandle).

pub mod client;
pub mod config;
pub(crate) mod error;
pub mod request;
pub mod streaming;
pub mod types;

pub use client::{OpenRouter, Reply};
pub use config::{OPENROUTER_BASE_URL, OpenRouterConfig};
pub use request::{ChatRequest, CompletionOptions, RequestBuilder};
pub use streaming::{SseDecoder, parse_sse_stream};
pub use types::ChatCompletionBody;

// Re-export unai-types for convenience
pub use unai_types::{ChatError, StreamEvent, StreamHandle};

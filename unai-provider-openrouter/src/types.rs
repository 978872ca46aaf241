//! Chat Completions wire types.

use serde::{Deserialize, Serialize};
use unai_types::{Message, Role};

/// Chat Completions request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionBody {
    /// Model identifier.
    pub model: String,
    /// Conversation history followed by the new user message.
    pub messages: Vec<Message>,
    /// Whether the response is streamed as SSE.
    pub stream: bool,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Non-streaming response body. Only the fields we read are modeled.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    pub role: Role,
    /// `null` when the model returned no text.
    #[serde(default)]
    pub content: Option<String>,
}

/// One `data:` payload of a streaming response.
#[derive(Debug, Deserialize)]
pub(crate) struct ChunkFrame {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

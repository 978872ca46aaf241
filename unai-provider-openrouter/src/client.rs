//! OpenRouter API client.

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use unai_types::{ChatError, Message, StreamEvent, StreamHandle};

use crate::config::OpenRouterConfig;
use crate::error::{map_http_status, map_reqwest_error};
use crate::request::{ChatRequest, CompletionOptions, RequestBuilder};
use crate::streaming::{single_shot_stream, stream_completion};
use crate::types::ChatCompletionResponse;

const EVENT_STREAM: &str = "text/event-stream";

/// Outcome of [`OpenRouter::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The whole assistant message (no sink was supplied).
    Message(Message),
    /// The reply was delivered through the sink and the stream completed.
    Streamed,
}

/// Client for the OpenRouter Chat Completions API.
///
/// Each call executes exactly one request; nothing is retried.
///
/// # Example
///
/// ```no_run
/// use unai_provider_openrouter::{OpenRouter, OpenRouterConfig};
///
/// # fn run() -> Result<(), unai_types::ChatError> {
/// let client = OpenRouter::new(OpenRouterConfig::from_env()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenRouter {
    config: OpenRouterConfig,
    options: CompletionOptions,
    client: reqwest::Client,
}

impl OpenRouter {
    /// Create a client for the given configuration.
    pub fn new(config: OpenRouterConfig) -> Self {
        Self {
            config,
            options: CompletionOptions::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client configured from the process environment.
    pub fn from_env() -> Result<Self, ChatError> {
        Ok(Self::new(OpenRouterConfig::from_env()?))
    }

    /// Attach sampling options to every request.
    #[must_use]
    pub fn options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// A request builder over this client's configuration and options.
    pub fn request_builder(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.config).options(self.options)
    }

    /// Send `history` + `user` to `model`.
    ///
    /// With a sink the response is streamed and every delta is passed to it,
    /// in order, before this returns [`Reply::Streamed`]. Without one the
    /// whole message is returned as [`Reply::Message`]. On failure, deltas
    /// already handed to the sink are not taken back.
    pub async fn send(
        &self,
        history: &[Message],
        user: Message,
        model: &str,
        sink: Option<&mut (dyn FnMut(&str) + Send)>,
    ) -> Result<Reply, ChatError> {
        let request = self
            .request_builder()
            .build(history, user, model, sink.is_some())?;

        let Some(sink) = sink else {
            return self.complete(request).await.map(Reply::Message);
        };

        let mut handle = self.complete_stream(request).await?;
        while let Some(event) = handle.next().await {
            match event? {
                StreamEvent::TextDelta(text) => sink(&text),
                StreamEvent::Completed => break,
            }
        }
        Ok(Reply::Streamed)
    }

    /// Execute a non-streaming request and return the first choice's message.
    pub async fn complete(&self, request: ChatRequest) -> Result<Message, ChatError> {
        if request.is_streaming() {
            return Err(ChatError::InvalidRequest(
                "complete() needs a request built with stream = false".into(),
            ));
        }

        tracing::debug!(
            endpoint = %request.endpoint,
            model = %request.body.model,
            messages = request.body.messages.len(),
            "sending completion request"
        );

        let response = self.execute(request).await?;
        let status = response.status();
        let response_text = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(map_http_status(status, &response_text));
        }

        first_choice(&response_text)
    }

    /// Execute a streaming request.
    ///
    /// Resolves once success headers arrive; a non-success status fails here
    /// with [`ChatError::Api`] and no stream is returned.
    ///
    /// A success response that is not `text/event-stream` is read whole as a
    /// regular completion and replayed as a single delta followed by
    /// [`StreamEvent::Completed`].
    pub async fn complete_stream(&self, request: ChatRequest) -> Result<StreamHandle, ChatError> {
        if !request.is_streaming() {
            return Err(ChatError::InvalidRequest(
                "complete_stream() needs a request built with stream = true".into(),
            ));
        }

        tracing::debug!(
            endpoint = %request.endpoint,
            model = %request.body.model,
            messages = request.body.messages.len(),
            "sending streaming completion request"
        );

        let response = self.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.map_err(map_reqwest_error)?;
            return Err(map_http_status(status, &body_text));
        }

        if !is_event_stream(&response) {
            tracing::debug!(
                content_type = ?response.headers().get(CONTENT_TYPE),
                "streaming request answered without an event stream, reading whole body"
            );
            let response_text = response.text().await.map_err(map_reqwest_error)?;
            let message = first_choice(&response_text)?;
            return Ok(single_shot_stream(message.content));
        }

        Ok(stream_completion(response))
    }

    async fn execute(&self, request: ChatRequest) -> Result<reqwest::Response, ChatError> {
        self.client
            .request(request.method, &request.endpoint)
            .headers(request.headers)
            .json(&request.body)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

fn is_event_stream(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains(EVENT_STREAM))
}

/// Extract the first choice's message from a whole completion body.
fn first_choice(response_text: &str) -> Result<Message, ChatError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(response_text)
        .map_err(|e| ChatError::InvalidResponse(format!("invalid JSON response: {e}")))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ChatError::InvalidResponse("response has no choices".into()))?;

    Ok(Message::new(
        choice.message.role,
        choice.message.content.unwrap_or_default(),
    ))
}

//! The chat session controller.
//!
//! A [`ChatSession`] owns the conversation shown to the user. Every user
//! turn appends exactly two messages: the user's text, then one assistant
//! reply. When streaming, the reply starts as an empty placeholder whose
//! content only ever grows as deltas arrive. If the request fails the
//! placeholder keeps whatever arrived, or becomes [`FALLBACK_REPLY`] when
//! nothing did, and is flagged with [`Message::error`].
//!
//! History and model selection are written to the [`StateStore`] after each
//! change and read back by [`ChatSession::restore`].

use unai_provider_openrouter::{OpenRouter, Reply};
use unai_types::{
    ChatError, DEFAULT_MODEL, FALLBACK_REPLY, HISTORY_KEY, Message, SELECTED_MODEL_KEY,
    StateStore, StorageError, find_model,
};

/// A persisted conversation bound to one OpenRouter client.
pub struct ChatSession<S: StateStore> {
    client: OpenRouter,
    store: S,
    history: Vec<Message>,
    model: String,
    system_prompt: Option<String>,
}

impl<S: StateStore> std::fmt::Debug for ChatSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("model", &self.model)
            .field("messages", &self.history.len())
            .field("system_prompt", &self.system_prompt.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: StateStore> ChatSession<S> {
    /// Load the stored conversation and model selection.
    ///
    /// A missing history starts empty; a stored history that no longer
    /// parses, as a message list or as JSON at all, is discarded with a
    /// warning. A missing, blank or unreadable model selection falls back
    /// to [`DEFAULT_MODEL`]. Only I/O failures of the store are returned.
    pub async fn restore(client: OpenRouter, store: S) -> Result<Self, ChatError> {
        let history = match read_lenient(&store, HISTORY_KEY).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable chat history");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let model = match read_lenient(&store, SELECTED_MODEL_KEY).await? {
            Some(serde_json::Value::String(id)) if !id.trim().is_empty() => id,
            _ => DEFAULT_MODEL.to_string(),
        };

        tracing::debug!(messages = history.len(), %model, "chat session restored");

        Ok(Self {
            client,
            store,
            history,
            model,
            system_prompt: None,
        })
    }

    /// Prepend a system prompt to every outbound request.
    ///
    /// The prompt is never added to the stored history.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = (!prompt.trim().is_empty()).then_some(prompt);
        self
    }

    /// The conversation, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The selected model id.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The system prompt, if one is set.
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Select the model for subsequent requests and persist the choice.
    ///
    /// Ids outside the built-in catalog are accepted as-is.
    pub async fn select_model(&mut self, id: &str) -> Result<(), ChatError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ChatError::InvalidRequest("model id is empty".into()));
        }

        match find_model(id) {
            Some(model) => tracing::info!(id, name = %model.display_name, "model selected"),
            None => tracing::info!(id, "model selected (not in catalog)"),
        }

        self.model = id.to_string();
        self.store
            .write(SELECTED_MODEL_KEY, serde_json::Value::String(self.model.clone()))
            .await?;
        Ok(())
    }

    /// Send one user turn and record the assistant's reply.
    ///
    /// With a sink the reply is streamed: each delta is appended to the
    /// assistant placeholder and then passed to the sink. Without one the
    /// whole reply is awaited.
    ///
    /// Returns the recorded assistant message. On failure the error is
    /// returned after the failed reply has been recorded and persisted.
    pub async fn send(
        &mut self,
        text: &str,
        sink: Option<&mut (dyn FnMut(&str) + Send)>,
    ) -> Result<Message, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::InvalidRequest("message is empty".into()));
        }

        let outbound = self.outbound_history();
        let user = Message::user(text);
        self.history.push(user.clone());
        self.persist_best_effort().await;

        tracing::info!(
            model = %self.model,
            streaming = sink.is_some(),
            messages = outbound.len() + 1,
            "sending chat turn"
        );

        let reply_index = self.history.len();
        let outcome = match sink {
            Some(sink) => self.stream_reply(reply_index, &outbound, user, sink).await,
            None => self.whole_reply(&outbound, user).await,
        };

        if let Err(err) = outcome {
            tracing::warn!(error = %err, "chat turn failed");
            self.persist_best_effort().await;
            return Err(err);
        }

        self.persist_history().await?;
        Ok(self.history[reply_index].clone())
    }

    /// Forget the conversation, in memory and in the store.
    ///
    /// The model selection is kept.
    pub async fn clear(&mut self) -> Result<(), ChatError> {
        self.history.clear();
        self.store.delete(HISTORY_KEY).await?;
        tracing::info!("chat history cleared");
        Ok(())
    }

    /// Render the conversation for display.
    #[cfg(feature = "render")]
    pub fn render<R: unai_render::Renderer + ?Sized>(
        &self,
        renderer: &R,
    ) -> Vec<unai_render::RenderedMessage> {
        renderer.render_all(&self.history)
    }

    async fn whole_reply(&mut self, outbound: &[Message], user: Message) -> Result<(), ChatError> {
        let reply = self
            .client
            .send(outbound, user, &self.model, None)
            .await
            .and_then(|reply| match reply {
                Reply::Message(message) => Ok(message.content),
                Reply::Streamed => Err(ChatError::InvalidResponse(
                    "expected a whole reply, got a stream".into(),
                )),
            });

        match reply {
            Ok(content) => {
                self.history.push(Message::assistant(content));
                Ok(())
            }
            Err(err) => {
                self.history.push(Message::failed(FALLBACK_REPLY));
                Err(err)
            }
        }
    }

    async fn stream_reply(
        &mut self,
        index: usize,
        outbound: &[Message],
        user: Message,
        sink: &mut (dyn FnMut(&str) + Send),
    ) -> Result<(), ChatError> {
        self.history.push(Message::assistant(""));
        self.persist_best_effort().await;

        let Self {
            client,
            history,
            model,
            ..
        } = self;
        let content = &mut history[index].content;

        let result = {
            let mut forward = |delta: &str| {
                content.push_str(delta);
                sink(delta);
            };
            client.send(outbound, user, model, Some(&mut forward)).await
        };

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let reply = &mut history[index];
                if reply.content.is_empty() {
                    reply.content.push_str(FALLBACK_REPLY);
                } else {
                    tracing::debug!(len = reply.content.len(), "keeping partial reply");
                }
                reply.error = true;
                Err(err)
            }
        }
    }

    fn outbound_history(&self) -> Vec<Message> {
        let mut outbound = Vec::with_capacity(self.history.len() + 1);
        if let Some(prompt) = &self.system_prompt {
            outbound.push(Message::system(prompt.clone()));
        }
        outbound.extend_from_slice(&self.history);
        outbound
    }

    async fn persist_history(&self) -> Result<(), StorageError> {
        let value = serde_json::to_value(&self.history)?;
        self.store.write(HISTORY_KEY, value).await
    }

    async fn persist_best_effort(&self) {
        if let Err(e) = self.persist_history().await {
            tracing::warn!(error = %e, "failed to persist chat history");
        }
    }
}

/// Read `key`, treating a value the store cannot decode as absent.
async fn read_lenient<S: StateStore>(
    store: &S,
    key: &str,
) -> Result<Option<serde_json::Value>, StorageError> {
    match store.read(key).await {
        Err(StorageError::Serialization(e)) => {
            tracing::warn!(key, error = %e, "discarding undecodable stored value");
            Ok(None)
        }
        other => other,
    }
}

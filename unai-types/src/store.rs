//! Durable storage for conversation state.
//!
//! A store maps fixed string keys to JSON values. The chat session keeps the
//! conversation under [`HISTORY_KEY`] and the selected model id under
//! [`SELECTED_MODEL_KEY`], restoring both at start and saving after every
//! mutation.

use async_trait::async_trait;

use crate::error::StorageError;

/// Key holding the conversation as a JSON array of messages.
pub const HISTORY_KEY: &str = "chatHistory";

/// Key holding the selected model id as a JSON string.
pub const SELECTED_MODEL_KEY: &str = "selectedModel";

/// Key/value persistence used by the chat session.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a value. Missing keys read as `None`.
    async fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn write(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: StateStore + ?Sized> StateStore for std::sync::Arc<T> {
    async fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        (**self).write(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key).await
    }
}

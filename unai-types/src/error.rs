//! Error types for all unai crates.

/// Text shown in place of an assistant reply when a send fails.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Errors from sending a chat request.
///
/// None of these are retried automatically; a failed send needs an explicit
/// re-submission by the user.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Missing or invalid endpoint/credential. Raised before any network I/O.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider answered with a non-success HTTP status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider-supplied error message, or the status text.
        message: String,
    },

    /// Transport failure before headers arrived or while reading the body.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A success response whose body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The caller handed in something that cannot be sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The caller cancelled an in-flight stream.
    #[error("cancelled")]
    Cancelled,

    /// Persisting the conversation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ChatError {
    /// The message to show a user for this error.
    ///
    /// Configuration problems become a setup instruction, provider errors
    /// are passed through verbatim and transport problems get a generic
    /// connectivity line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(detail) => format!(
                "Configuration error: {detail}. Set OPENROUTER_API_KEY and OPENROUTER_BASE_URL in your environment."
            ),
            Self::Api { status, message } => format!("API Error ({status}): {message}"),
            Self::Network(_) => {
                "Network error: Unable to reach the API. Please check your internet connection."
                    .to_string()
            }
            _ => FALLBACK_REPLY.to_string(),
        }
    }
}

/// Errors from conversation storage.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// I/O error during a storage operation.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#![deny(missing_docs)]
//! # unai — umbrella crate
//!
//! A chat client for OpenRouter. [`ChatSession`] owns the conversation,
//! sends each user turn through the OpenRouter client (whole-shot or
//! streamed), and persists history and model selection through a
//! [`StateStore`](unai_types::StateStore). Rendering and storage backends
//! are re-exported behind feature flags, plus a `prelude` for the happy path.

pub mod session;

pub use session::ChatSession;

pub use unai_provider_openrouter;
#[cfg(feature = "render")]
pub use unai_render;
#[cfg(feature = "state-fs")]
pub use unai_state_fs;
#[cfg(feature = "state-memory")]
pub use unai_state_memory;
pub use unai_types;

/// Happy-path imports for building a chat front end.
pub mod prelude {
    pub use crate::session::ChatSession;

    pub use unai_types::{
        ChatError, DEFAULT_MODEL, FALLBACK_REPLY, Message, ModelDescriptor, Role, StateStore,
        StreamEvent, catalog, find_model,
    };

    pub use unai_provider_openrouter::{CompletionOptions, OpenRouter, OpenRouterConfig, Reply};

    #[cfg(feature = "render")]
    pub use unai_render::{PlainRenderer, ReasoningStream, RenderedMessage, Renderer};

    #[cfg(feature = "state-memory")]
    pub use unai_state_memory::MemoryStore;

    #[cfg(feature = "state-fs")]
    pub use unai_state_fs::FsStore;
}

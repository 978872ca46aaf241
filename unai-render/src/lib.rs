#![deny(missing_docs)]
//! Rendering collaborator for unai.
//!
//! Assistant content may embed `<reasoning>…</reasoning>` sections. This
//! crate separates them from the primary display text, both for a finished
//! message ([`split_reasoning`]) and progressively while deltas arrive
//! ([`ReasoningStream`]). [`Renderer`] is the seam a front end implements;
//! [`PlainRenderer`] is the text-only default.

pub mod reasoning;
pub mod renderer;

pub use reasoning::{
    REASONING_CLOSE, REASONING_OPEN, ReasoningSplit, ReasoningState, ReasoningStream,
    split_reasoning,
};
pub use renderer::{PlainRenderer, RenderedMessage, Renderer};

//! The [`Renderer`] seam and its text-only implementation.

use serde::Serialize;
use unai_types::{Message, Role};

use crate::reasoning::{ReasoningState, split_reasoning};

/// A message prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    /// Author of the message.
    pub role: Role,
    /// Primary display text.
    pub body: String,
    /// Reasoning to reveal on request, if the message carried any.
    pub reasoning: Option<String>,
    /// Whether reasoning is still arriving (unterminated section).
    pub reasoning_in_progress: bool,
    /// The message stands in for a failed reply and should be styled as one.
    pub error: bool,
}

/// Turns a [`Message`] into display output.
///
/// Implementations may add formatting (markdown, highlighting) but must
/// keep reasoning sections out of [`RenderedMessage::body`].
pub trait Renderer: Send + Sync {
    /// Render one message.
    fn render(&self, message: &Message) -> RenderedMessage;

    /// Render a whole conversation in order.
    fn render_all(&self, messages: &[Message]) -> Vec<RenderedMessage> {
        messages.iter().map(|m| self.render(m)).collect()
    }
}

/// Text-only renderer.
///
/// Assistant messages have their reasoning split out; user and system
/// messages pass through verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, message: &Message) -> RenderedMessage {
        if message.role != Role::Assistant {
            return RenderedMessage {
                role: message.role,
                body: message.content.clone(),
                reasoning: None,
                reasoning_in_progress: false,
                error: message.error,
            };
        }

        let split = split_reasoning(&message.content);
        RenderedMessage {
            role: message.role,
            body: split.display,
            reasoning: split.reasoning,
            reasoning_in_progress: split.state == ReasoningState::Open,
            error: message.error,
        }
    }
}

impl<T: Renderer + ?Sized> Renderer for &T {
    fn render(&self, message: &Message) -> RenderedMessage {
        (**self).render(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_reasoning_is_split() {
        let rendered = PlainRenderer.render(&Message::assistant(
            "<reasoning>check units</reasoning>42 km",
        ));
        assert_eq!(rendered.role, Role::Assistant);
        assert_eq!(rendered.body, "42 km");
        assert_eq!(rendered.reasoning.as_deref(), Some("check units"));
        assert!(!rendered.reasoning_in_progress);
    }

    #[test]
    fn user_text_with_tags_is_verbatim() {
        let text = "what does <reasoning>x</reasoning> mean?";
        let rendered = PlainRenderer.render(&Message::user(text));
        assert_eq!(rendered.body, text);
        assert_eq!(rendered.reasoning, None);
    }

    #[test]
    fn open_reasoning_is_flagged() {
        let rendered = PlainRenderer.render(&Message::assistant("<reasoning>hmm"));
        assert_eq!(rendered.body, "");
        assert!(rendered.reasoning_in_progress);
    }

    #[test]
    fn failed_reply_is_flagged() {
        let rendered = PlainRenderer.render(&Message::failed("Sorry, try again."));
        assert!(rendered.error);
        assert_eq!(rendered.body, "Sorry, try again.");
        assert!(!PlainRenderer.render(&Message::assistant("fine")).error);
    }

    #[test]
    fn render_all_keeps_order() {
        let messages = vec![
            Message::system("be brief"),
            Message::user("hi"),
            Message::assistant("hello"),
        ];
        let roles: Vec<Role> = PlainRenderer
            .render_all(&messages)
            .into_iter()
            .map(|r| r.role)
            .collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[test]
    fn rendered_message_serializes() {
        let rendered = PlainRenderer.render(&Message::assistant("plain"));
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["body"], "plain");
        assert!(json["reasoning"].is_null());
        assert_eq!(json["error"], false);
    }
}

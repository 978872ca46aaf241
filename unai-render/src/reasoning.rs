//! Reasoning-section extraction.
//!
//! ```text
//! Hi <reasoning>user greets</reasoning>there
//! └─ display: "Hi there"   reasoning: "user greets"   state: Complete
//!
//! <reasoning>still think
//! └─ display: ""           reasoning: "still think"   state: Open
//! ```
//!
//! Content with no opening tag passes through untouched. Once a section has
//! been removed, the display text is trimmed at both ends.

use serde::Serialize;

/// Opening delimiter of a reasoning section.
pub const REASONING_OPEN: &str = "<reasoning>";
/// Closing delimiter of a reasoning section.
pub const REASONING_CLOSE: &str = "</reasoning>";

const SECTION_SEPARATOR: &str = "\n\n";

/// Whether, and how completely, content carries reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningState {
    /// No opening tag.
    Absent,
    /// Every opened section is closed.
    Complete,
    /// The last section is still open; more reasoning may follow.
    Open,
}

/// Content split into display text and reasoning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasoningSplit {
    /// Content with every reasoning section removed.
    pub display: String,
    /// Extracted sections, trimmed and joined by a blank line. `None` when
    /// [`ReasoningState::Absent`].
    pub reasoning: Option<String>,
    /// See [`ReasoningState`].
    pub state: ReasoningState,
}

impl ReasoningSplit {
    fn passthrough(content: &str) -> Self {
        Self {
            display: content.to_string(),
            reasoning: None,
            state: ReasoningState::Absent,
        }
    }

    /// True while an unterminated section is being received.
    pub fn is_reasoning_in_progress(&self) -> bool {
        self.state == ReasoningState::Open
    }
}

/// Separate every `<reasoning>` section from `content`.
///
/// An unterminated section (opening tag without a closing tag) runs to the
/// end of the content and is hidden from the display.
pub fn split_reasoning(content: &str) -> ReasoningSplit {
    if !content.contains(REASONING_OPEN) {
        return ReasoningSplit::passthrough(content);
    }

    let mut display = String::with_capacity(content.len());
    let mut sections: Vec<&str> = Vec::new();
    let mut state = ReasoningState::Complete;
    let mut rest = content;

    while let Some(open) = rest.find(REASONING_OPEN) {
        display.push_str(&rest[..open]);
        let inner = &rest[open + REASONING_OPEN.len()..];

        match inner.find(REASONING_CLOSE) {
            Some(close) => {
                sections.push(inner[..close].trim());
                rest = &inner[close + REASONING_CLOSE.len()..];
            }
            None => {
                sections.push(inner.trim());
                rest = "";
                state = ReasoningState::Open;
                break;
            }
        }
    }
    display.push_str(rest);

    let reasoning = sections
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR);

    ReasoningSplit {
        display: display.trim().to_string(),
        reasoning: Some(reasoning),
        state,
    }
}

/// Progressive splitter for an assistant message that is still streaming.
///
/// Every [`push`](Self::push) re-splits the accumulated content. A trailing
/// fragment that could still become a delimiter (`"<reas"`, `"</reaso"`) is
/// held back until the next delta resolves it, so a half-received tag never
/// flashes into the display.
///
/// ```
/// use unai_render::{ReasoningState, ReasoningStream};
///
/// let mut stream = ReasoningStream::new();
/// assert_eq!(stream.push("Answer <reas").display, "Answer ");
/// let split = stream.push("oning>thinking");
/// assert_eq!(split.state, ReasoningState::Open);
/// assert_eq!(stream.finish().reasoning.as_deref(), Some("thinking"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ReasoningStream {
    content: String,
}

impl ReasoningStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Append a delta and return the current split.
    pub fn push(&mut self, delta: &str) -> ReasoningSplit {
        self.content.push_str(delta);
        let held = partial_delimiter_len(&self.content);
        split_reasoning(&self.content[..self.content.len() - held])
    }

    /// Split the complete content, including any held-back fragment.
    pub fn finish(&self) -> ReasoningSplit {
        split_reasoning(&self.content)
    }
}

/// Length of the longest suffix of `text` that is a proper prefix of either
/// delimiter.
fn partial_delimiter_len(text: &str) -> usize {
    partial_suffix_len(text, REASONING_OPEN).max(partial_suffix_len(text, REASONING_CLOSE))
}

fn partial_suffix_len(text: &str, delimiter: &str) -> usize {
    let longest = (delimiter.len() - 1).min(text.len());
    (1..=longest)
        .rev()
        .find(|&n| {
            let start = text.len() - n;
            text.is_char_boundary(start) && delimiter.starts_with(&text[start..])
        })
        .unwrap_or(0)
}

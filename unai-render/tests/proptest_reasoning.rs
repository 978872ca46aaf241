use proptest::prelude::*;
use unai_render::{REASONING_OPEN, ReasoningState, ReasoningStream, split_reasoning};

/// Text built from plain words and reasoning delimiters, so tags show up often.
fn tagged_content() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z é<>/]{0,6}",
            Just("<reasoning>".to_string()),
            Just("</reasoning>".to_string()),
        ],
        0..10,
    )
    .prop_map(|parts| parts.concat())
}

fn chunk(content: &str, points: &[usize]) -> Vec<String> {
    let mut cuts: Vec<usize> = points
        .iter()
        .map(|p| p % (content.len() + 1))
        .filter(|&p| content.is_char_boundary(p))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(content[start..cut].to_string());
        start = cut;
    }
    chunks.push(content[start..].to_string());
    chunks
}

proptest! {
    #[test]
    fn stream_finish_matches_whole_split(
        content in tagged_content(),
        points in prop::collection::vec(any::<usize>(), 0..8),
    ) {
        let mut stream = ReasoningStream::new();
        for delta in chunk(&content, &points) {
            stream.push(&delta);
        }
        prop_assert_eq!(stream.content(), content.as_str());
        prop_assert_eq!(stream.finish(), split_reasoning(&content));
    }

    #[test]
    fn reasoning_once_seen_is_never_lost(
        content in tagged_content(),
        points in prop::collection::vec(any::<usize>(), 0..8),
    ) {
        let mut stream = ReasoningStream::new();
        let mut seen = false;
        for delta in chunk(&content, &points) {
            let split = stream.push(&delta);
            if seen {
                prop_assert_ne!(split.state, ReasoningState::Absent);
            }
            seen |= split.state != ReasoningState::Absent;
        }
    }

    #[test]
    fn untagged_content_is_identity(content in "[a-z <>/\n]{0,40}") {
        prop_assume!(!content.contains(REASONING_OPEN));
        let split = split_reasoning(&content);
        prop_assert_eq!(split.state, ReasoningState::Absent);
        prop_assert_eq!(split.display, content);
    }
}

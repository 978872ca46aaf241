//! SSE streaming support for the Chat Completions API.
//!
//! The response body arrives as arbitrarily sized byte chunks. Bytes are
//! buffered until a `\n` is seen, so a frame split across chunks (or a UTF-8
//! sequence split mid-character) is only decoded once complete:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//!
//! : OPENROUTER PROCESSING
//!
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//!
//! data: [DONE]
//! ```
//!
//! Each complete line is trimmed. Blank lines, `data: [DONE]` and lines that
//! are not `data: ` lines are ignored. A `data: ` payload that is not valid
//! JSON is logged and skipped without ending the stream.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Response;
use tokio_util::sync::CancellationToken;
use unai_types::{ChatError, StreamEvent, StreamHandle};

use crate::types::ChunkFrame;

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "data: [DONE]";

/// A single `data:` payload that could not be decoded.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FrameError {
    #[error("invalid JSON in stream frame: {0}")]
    Json(#[from] serde_json::Error),
}

/// Wrap an HTTP response body into a [`StreamHandle`].
pub(crate) fn stream_completion(response: Response) -> StreamHandle {
    let cancellation = CancellationToken::new();
    let events = parse_sse_stream(response.bytes_stream(), cancellation.clone());
    StreamHandle {
        receiver: Box::pin(events),
        cancellation,
    }
}

/// A [`StreamHandle`] over a reply that arrived in one piece.
pub(crate) fn single_shot_stream(content: String) -> StreamHandle {
    let mut events = Vec::with_capacity(2);
    if !content.is_empty() {
        events.push(Ok(StreamEvent::TextDelta(content)));
    }
    events.push(Ok(StreamEvent::Completed));
    StreamHandle {
        receiver: Box::pin(futures::stream::iter(events)),
        cancellation: CancellationToken::new(),
    }
}

enum Read<E> {
    Chunk(Bytes),
    Failed(E),
    Ended,
    Cancelled,
}

/// Turn a raw byte stream into ordered [`StreamEvent`]s.
///
/// The next chunk is only requested once every line of the previous one has
/// been yielded. On end-of-stream any unterminated final line is decoded
/// before [`StreamEvent::Completed`]. A read error ends the stream with
/// [`ChatError::Network`]; deltas already yielded stand.
pub fn parse_sse_stream<S, E>(
    byte_stream: S,
    cancellation: CancellationToken,
) -> impl Stream<Item = Result<StreamEvent, ChatError>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    async_stream::stream! {
        let mut decoder = SseDecoder::new();
        let mut bytes_stream = std::pin::pin!(byte_stream);

        loop {
            let read = tokio::select! {
                biased;
                () = cancellation.cancelled() => Read::Cancelled,
                next = bytes_stream.next() => match next {
                    Some(Ok(chunk)) => Read::Chunk(chunk),
                    Some(Err(e)) => Read::Failed(e),
                    None => Read::Ended,
                },
            };

            match read {
                Read::Chunk(chunk) => {
                    for delta in decoder.push(&chunk) {
                        tracing::trace!(len = delta.len(), "stream delta");
                        yield Ok(StreamEvent::TextDelta(delta));
                    }
                }
                Read::Failed(e) => {
                    tracing::debug!(error = %e, "stream read failed");
                    yield Err(ChatError::Network(Box::new(e)));
                    return;
                }
                Read::Cancelled => {
                    tracing::debug!("stream cancelled by caller");
                    yield Err(ChatError::Cancelled);
                    return;
                }
                Read::Ended => {
                    if let Some(delta) = decoder.finish() {
                        tracing::trace!(len = delta.len(), "stream delta from unterminated line");
                        yield Ok(StreamEvent::TextDelta(delta));
                    }
                    tracing::debug!("stream completed");
                    yield Ok(StreamEvent::Completed);
                    return;
                }
            }
        }
    }
}

/// Line buffer and frame decoder for one SSE response.
///
/// Holds the unterminated tail of the byte stream between reads. Feeding the
/// same bytes in any chunking yields the same deltas.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the deltas of every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };
        let tail = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, tail);

        complete
            .split(|b| *b == b'\n')
            .filter_map(decode_line)
            .collect()
    }

    /// Decode whatever is left in the buffer as a final line.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        decode_line(&rest)
    }
}

/// Decode one line into a delta, if it carries one.
fn decode_line(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let line = text.trim();
    if line.is_empty() || line == DONE_MARKER {
        return None;
    }
    let payload = line.strip_prefix(DATA_PREFIX)?;

    match parse_frame(payload) {
        Ok(delta) => delta,
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed stream frame");
            None
        }
    }
}

/// Extract `choices[0].delta.content` from a frame payload.
fn parse_frame(payload: &str) -> Result<Option<String>, FrameError> {
    let frame: ChunkFrame = serde_json::from_str(payload)?;

    if let Some(error) = frame.error {
        tracing::warn!(%error, "provider reported an error inside the stream");
    }

    Ok(frame
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty()))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(text: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({"choices": [{"delta": {"content": text}}]})
        )
    }

    fn decode_all(chunks: &[&[u8]]) -> Vec<String> {
        let mut decoder = SseDecoder::new();
        let mut deltas = Vec::new();
        for chunk in chunks {
            deltas.extend(decoder.push(chunk));
        }
        deltas.extend(decoder.finish());
        deltas
    }

    async fn collect(
        chunks: Vec<Result<Bytes, std::io::Error>>,
    ) -> Vec<Result<StreamEvent, ChatError>> {
        let stream = parse_sse_stream(futures::stream::iter(chunks), CancellationToken::new());
        stream.collect().await
    }

    #[test]
    fn parse_text_deltas() {
        let sse = format!("{}{}data: [DONE]\n", frame("Hello "), frame("world"));
        assert_eq!(decode_all(&[sse.as_bytes()]), vec!["Hello ", "world"]);
    }

    #[test]
    fn two_chunk_example() {
        let first = br#"data: {"choices":[{"delta":{"content":"Hel"}}]}
"#;
        let second = br#"data: {"choices":[{"delta":{"content":"lo"}}]}
data: [DONE]
"#;
        assert_eq!(decode_all(&[&first[..], &second[..]]), vec!["Hel", "lo"]);
    }

    #[test]
    fn line_is_held_until_newline() {
        let line = frame("split");
        let (a, b) = line.as_bytes().split_at(17);
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(a).is_empty());
        assert_eq!(decoder.push(b), vec!["split"]);
    }

    #[test]
    fn multibyte_character_split_across_chunks() {
        let line = frame("héllo 🎉");
        let bytes = line.as_bytes();
        let emoji_start = line.find('🎉').unwrap();
        let (a, b) = bytes.split_at(emoji_start + 2);
        assert_eq!(decode_all(&[a, b]), vec!["héllo 🎉"]);
    }

    #[test]
    fn malformed_frame_is_skipped() {
        let sse = format!("{}data: {{not json\n{}", frame("one"), frame("two"));
        assert_eq!(decode_all(&[sse.as_bytes()]), vec!["one", "two"]);
    }

    #[test]
    fn role_only_and_empty_frames_produce_nothing() {
        let sse = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\
                   data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}],\"usage\":{\"total_tokens\":3}}\n\
                   data: {\"choices\":[]}\n";
        assert!(decode_all(&[sse.as_bytes()]).is_empty());
    }

    #[test]
    fn comments_and_other_fields_are_ignored() {
        let sse = format!(": OPENROUTER PROCESSING\n\nevent: message\n{}", frame("x"));
        assert_eq!(decode_all(&[sse.as_bytes()]), vec!["x"]);
    }

    #[test]
    fn crlf_and_padding_are_trimmed() {
        let sse = "  data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}  \r\n\r\ndata: [DONE]\r\n";
        assert_eq!(decode_all(&[sse.as_bytes()]), vec!["a"]);
    }

    #[test]
    fn error_frame_produces_nothing() {
        let sse = format!(
            "data: {{\"error\":{{\"message\":\"overloaded\",\"code\":502}}}}\n{}",
            frame("after")
        );
        assert_eq!(decode_all(&[sse.as_bytes()]), vec!["after"]);
    }

    #[test]
    fn unterminated_final_line_is_flushed() {
        let sse = r#"data: {"choices":[{"delta":{"content":"tail"}}]}"#;
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(sse.as_bytes()).is_empty());
        assert_eq!(decoder.finish(), Some("tail".to_string()));
    }

    #[test]
    fn unterminated_done_marker_is_ignored() {
        let mut decoder = SseDecoder::new();
        decoder.push(b"data: [DONE]");
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn finish_drains_buffer() {
        let mut decoder = SseDecoder::new();
        decoder.push(br#"data: {"choices":[{"delta":{"content":"x"}}]}"#);
        assert!(decoder.finish().is_some());
        assert!(decoder.finish().is_none());
    }

    #[tokio::test]
    async fn stream_ends_with_completed() {
        let events = collect(vec![
            Ok(Bytes::from(frame("Hel"))),
            Ok(Bytes::from(format!("{}data: [DONE]\n", frame("lo")))),
        ])
        .await;
        let events: Vec<StreamEvent> = events.into_iter().map(Result::unwrap).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta("Hel".into()),
                StreamEvent::TextDelta("lo".into()),
                StreamEvent::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn read_error_fails_after_delivered_deltas() {
        let events = collect(vec![
            Ok(Bytes::from(frame("partial"))),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )),
            Ok(Bytes::from(frame("never"))),
        ])
        .await;
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], Ok(StreamEvent::TextDelta(t)) if t == "partial"));
        assert!(matches!(&events[1], Err(ChatError::Network(_))));
    }

    #[tokio::test]
    async fn empty_body_completes() {
        let events = collect(vec![]).await;
        assert!(matches!(events.as_slice(), [Ok(StreamEvent::Completed)]));
    }

    #[tokio::test]
    async fn cancelled_stream_stops_reading() {
        let token = CancellationToken::new();
        token.cancel();
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![Ok(Bytes::from(frame("x")))];
        let events: Vec<_> = parse_sse_stream(futures::stream::iter(chunks), token)
            .collect()
            .await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(ChatError::Cancelled)));
    }

    #[tokio::test]
    async fn cancel_mid_stream_keeps_earlier_deltas() {
        let token = CancellationToken::new();
        let (tx, rx) = futures::channel::mpsc::unbounded::<Result<Bytes, std::io::Error>>();
        let mut stream = Box::pin(parse_sse_stream(rx, token.clone()));

        tx.unbounded_send(Ok(Bytes::from(frame("first")))).unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, StreamEvent::TextDelta("first".into()));

        token.cancel();
        assert!(matches!(stream.next().await, Some(Err(ChatError::Cancelled))));
        assert!(stream.next().await.is_none());
        drop(tx);
    }

    #[tokio::test]
    async fn single_shot_stream_replays_whole_reply() {
        let events: Vec<_> = single_shot_stream("hello!".into()).collect().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], Ok(StreamEvent::TextDelta(t)) if t == "hello!"));
        assert!(matches!(events[1], Ok(StreamEvent::Completed)));
    }

    #[tokio::test]
    async fn single_shot_stream_skips_empty_reply() {
        let events: Vec<_> = single_shot_stream(String::new()).collect().await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Ok(StreamEvent::Completed)));
    }
}

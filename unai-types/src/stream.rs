//! Streaming event types for incremental chat responses.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::ChatError;

/// An event emitted during a streaming completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text content, in transport order.
    TextDelta(String),
    /// The transport signalled end-of-stream. Always the last item.
    Completed,
}

/// Handle to a streaming completion response.
///
/// Items are produced only while the handle is polled, so a slow consumer
/// throttles how fast the response body is read. The stream ends after
/// [`StreamEvent::Completed`] or the first error.
///
/// Cancelling the token or dropping the handle closes the underlying
/// connection.
pub struct StreamHandle {
    /// The stream of events. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = Result<StreamEvent, ChatError>> + Send>>,
    /// Cancels the in-flight stream; it then yields [`ChatError::Cancelled`].
    pub cancellation: CancellationToken,
}

impl StreamHandle {
    /// Request cancellation of the stream.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Stream for StreamHandle {
    type Item = Result<StreamEvent, ChatError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn handle_from(items: Vec<Result<StreamEvent, ChatError>>) -> StreamHandle {
        StreamHandle {
            receiver: Box::pin(futures::stream::iter(items)),
            cancellation: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn handle_is_a_stream() {
        let mut handle = handle_from(vec![
            Ok(StreamEvent::TextDelta("Hel".into())),
            Ok(StreamEvent::TextDelta("lo".into())),
            Ok(StreamEvent::Completed),
        ]);
        let mut text = String::new();
        while let Some(item) = handle.next().await {
            if let StreamEvent::TextDelta(t) = item.unwrap() {
                text.push_str(&t);
            }
        }
        assert_eq!(text, "Hello");
    }

    #[test]
    fn cancel_trips_token() {
        let handle = handle_from(vec![]);
        let token = handle.cancellation.clone();
        handle.cancel();
        assert!(token.is_cancelled());
        assert!(format!("{handle:?}").contains("cancelled: true"));
    }
}

//! Server-Sent Events (SSE) streaming parser.
//!
//! The Gemini streaming endpoint (`alt=sse`) emits one JSON chunk per
//! `data:` event. This module turns any byte stream (usually
//! `reqwest::Response::bytes_stream`) into a lazy stream of events, so the
//! consumer decides how far to read and can stop at any delta boundary.

use std::io::Cursor;
use std::pin::Pin;

use futures_util::{stream, Stream, StreamExt};
use tokio::io::{AsyncBufReadExt, Lines};
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The `event:` field, if the server sent one.
    pub event: Option<String>,
    /// The event data; multiple `data:` lines are joined with `\n`.
    pub data: String,
}

type ByteStream<B> = Pin<Box<dyn Stream<Item = std::io::Result<Cursor<B>>> + Send>>;

struct SseDecoder<B> {
    lines: Lines<StreamReader<ByteStream<B>, Cursor<B>>>,
    event: Option<String>,
    data: String,
    finished: bool,
}

impl<B> SseDecoder<B> {
    fn push_line(&mut self, line: &str) {
        if let Some(event_type) = field_value(line, "event") {
            self.event = Some(event_type.to_string());
        } else if let Some(data) = field_value(line, "data") {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(data);
        }
        // id:, retry: and `:` comments are ignored
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() {
            self.event = None;
            return None;
        }
        Some(SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data),
        })
    }
}

/// `data: x` and `data:x` are both legal.
fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Decode a byte stream into SSE events.
///
/// Transport errors end the stream with a single `NetworkError` item.
pub fn sse_events<S, B, E>(byte_stream: S) -> impl Stream<Item = Result<SseEvent, AiError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Unpin + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let byte_stream: ByteStream<B> = Box::pin(
        byte_stream.map(|result| result.map(Cursor::new).map_err(std::io::Error::other)),
    );
    let decoder = SseDecoder {
        lines: StreamReader::new(byte_stream).lines(),
        event: None,
        data: String::new(),
        finished: false,
    };

    stream::unfold(decoder, |mut dec| async move {
        if dec.finished {
            return None;
        }
        loop {
            match dec.lines.next_line().await {
                Ok(Some(line)) => {
                    if line.is_empty() {
                        // Empty line = end of event
                        if let Some(event) = dec.take_event() {
                            return Some((Ok(event), dec));
                        }
                        continue;
                    }
                    dec.push_line(&line);
                }
                Ok(None) => {
                    dec.finished = true;
                    // Flush an event the server did not terminate
                    return dec.take_event().map(|event| (Ok(event), dec));
                }
                Err(e) => {
                    dec.finished = true;
                    return Some((Err(AiError::NetworkError(e.to_string())), dec));
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<&'static [u8], std::io::Error>> {
        let items: Vec<_> = parts.iter().map(|p| Ok(p.as_bytes())).collect();
        stream::iter(items)
    }

    async fn collect(parts: &[&'static str]) -> Vec<Result<SseEvent, AiError>> {
        sse_events(chunks(parts)).collect().await
    }

    #[tokio::test]
    async fn parses_data_events() {
        let events = collect(&["data: {\"a\":1}\n\ndata: {\"a\":2}\n\n"]).await;
        let data: Vec<_> = events.into_iter().map(|e| e.unwrap().data).collect();
        assert_eq!(data, vec!["{\"a\":1}", "{\"a\":2}"]);
    }

    #[tokio::test]
    async fn event_split_across_chunks() {
        let events = collect(&["da", "ta: hel", "lo\r\n", "\r\n"]).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap().data, "hello");
    }

    #[tokio::test]
    async fn event_type_and_multiline_data() {
        let events = collect(&["event: delta\ndata: one\ndata:two\n\n"]).await;
        let event = events[0].as_ref().unwrap();
        assert_eq!(event.event.as_deref(), Some("delta"));
        assert_eq!(event.data, "one\ntwo");
    }

    #[tokio::test]
    async fn comments_and_blank_events_are_skipped() {
        let events = collect(&[": keep-alive\n\n\n\ndata: x\n\n"]).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap().data, "x");
    }

    #[tokio::test]
    async fn unterminated_event_is_flushed() {
        let events = collect(&["data: tail"]).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap().data, "tail");
    }

    #[tokio::test]
    async fn transport_error_ends_stream() {
        let items: Vec<Result<&'static [u8], std::io::Error>> = vec![
            Ok(b"data: first\n\n"),
            Err(std::io::Error::other("connection reset")),
            Ok(b"data: never\n\n"),
        ];
        let events: Vec<_> = sse_events(stream::iter(items)).collect().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap().data, "first");
        assert!(matches!(events[1], Err(AiError::NetworkError(_))));
    }
}

//! Minimal `text/event-stream` decoding for the gallery insert feed.

use futures::stream::{Stream, StreamExt};

use emoji_shared::types::{event_types, EmojiRecord};

use crate::api::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    pub event: Option<String>,
    pub id: Option<String>,
    pub data: String,
}

/// Splits a byte stream into frames. Chunks may break anywhere, including
/// inside a UTF-8 sequence.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buf.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut frames = Vec::new();
        while let Some(end) = self.buf.windows(2).position(|w| w == b"\n\n") {
            let raw: Vec<u8> = self.buf.drain(..end + 2).collect();
            if let Some(frame) = parse_frame(&String::from_utf8_lossy(&raw[..end])) {
                frames.push(frame);
            }
        }
        frames
    }
}

/// `None` for comment-only blocks such as keep-alives.
fn parse_frame(block: &str) -> Option<SseFrame> {
    let mut frame = SseFrame::default();
    let mut data: Vec<&str> = Vec::new();
    let mut seen_field = false;

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        seen_field = true;
        match field {
            "event" => frame.event = Some(value.to_string()),
            "id" => frame.id = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }

    if !seen_field {
        return None;
    }
    frame.data = data.join("\n");
    Some(frame)
}

/// Decodes `emoji.inserted` frames into records; every other event is skipped.
pub fn insert_records<S, B>(chunks: S) -> impl Stream<Item = Result<EmojiRecord, ClientError>> + Send + 'static
where
    S: Stream<Item = Result<B, ClientError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    async_stream::stream! {
        let mut chunks = Box::pin(chunks);
        let mut decoder = SseDecoder::default();
        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(e);
                    break;
                }
            };
            for frame in decoder.push(chunk.as_ref()) {
                match frame.event.as_deref() {
                    Some(event_types::EMOJI_INSERTED) => {
                        yield serde_json::from_str::<EmojiRecord>(&frame.data).map_err(ClientError::from);
                    }
                    Some(event_types::LAG_WARNING) => {
                        tracing::warn!(data = %frame.data, "insert feed reported missed events");
                    }
                    _ => {}
                }
            }
        }
    }
}

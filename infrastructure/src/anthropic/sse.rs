//! Server-sent events decoding for streamed Messages API responses.
//!
//! [`SseParser`] turns arbitrary byte chunks into complete SSE events;
//! [`parse_stream_event`] maps an event onto what the client cares about.

use serde_json::Value;

/// One complete server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
}

/// Incremental SSE decoder.
///
/// Bytes are buffered until a blank line ends an event, so multi-byte
/// characters split across network chunks are decoded intact.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some((end, delimiter)) = find_event_end(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..end + delimiter).collect();
            if let Some(event) = parse_block(&block[..end]) {
                events.push(event);
            }
        }
        events
    }

    /// Decode whatever is left once the stream has ended.
    pub fn flush(&mut self) -> Vec<SseEvent> {
        let block = std::mem::take(&mut self.buffer);
        parse_block(&block).into_iter().collect()
    }
}

/// Position and length of the first event delimiter (`\n\n` or `\r\n\r\n`).
fn find_event_end(buffer: &[u8]) -> Option<(usize, usize)> {
    (0..buffer.len()).find_map(|i| {
        if buffer[i..].starts_with(b"\r\n\r\n") {
            Some((i, 4))
        } else if buffer[i..].starts_with(b"\n\n") {
            Some((i, 2))
        } else {
            None
        }
    })
}

fn parse_block(block: &[u8]) -> Option<SseEvent> {
    let text = String::from_utf8_lossy(block);
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }

    if event.is_none() && data.is_empty() {
        return None;
    }
    Some(SseEvent {
        event,
        data: data.join("\n"),
    })
}

/// What a stream event means to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamAction {
    TextDelta(String),
    Stop,
    Error(String),
}

/// Interpret a Messages API stream event.
///
/// Only text deltas, the end of the message and errors matter; pings,
/// block boundaries and usage updates are skipped.
pub fn parse_stream_event(event: &SseEvent) -> Option<StreamAction> {
    let data: Value = serde_json::from_str(&event.data).ok()?;
    let kind = data["type"].as_str().or(event.event.as_deref())?;

    match kind {
        "content_block_delta" => {
            let delta = &data["delta"];
            if delta["type"] == "text_delta" {
                delta["text"]
                    .as_str()
                    .map(|t| StreamAction::TextDelta(t.to_string()))
            } else {
                None
            }
        }
        "message_stop" => Some(StreamAction::Stop),
        "error" => {
            let message = data["error"]["message"]
                .as_str()
                .unwrap_or("unknown stream error");
            Some(StreamAction::Error(message.to_string()))
        }
        _ => None,
    }
}

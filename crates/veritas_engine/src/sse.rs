use serde::Deserialize;

use crate::LogEvent;

/// Event name carrying pipeline log frames.
const LOG_EVENT: &str = "log";

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: String,
}

/// Incremental `text/event-stream` decoder. Chunks may split lines anywhere.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    event: Option<String>,
    data: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a body chunk and returns every frame completed by it, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.pending.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(newline) = self.pending.iter().position(|byte| *byte == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=newline).collect();
            let text = String::from_utf8_lossy(&raw[..newline]);
            let line = text.strip_suffix('\r').unwrap_or(&text);
            if let Some(frame) = self.feed_line(line) {
                frames.push(frame);
            }
        }
        frames
    }

    fn feed_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => match &mut self.data {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => self.data = Some(value.to_string()),
            },
            // id and retry only matter for automatic reconnects, which we never do.
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        let data = self.data.take()?;
        Some(SseFrame { event, data })
    }
}

/// Outcome of interpreting one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Log(LogEvent),
    /// Not a `log` frame (keep-alives, other event names).
    Ignored,
    /// A `log` frame whose payload could not be decoded.
    Malformed(String),
}

#[derive(Deserialize)]
struct LogFrame {
    source: String,
    #[serde(rename = "type")]
    kind: String,
}

pub fn decode_log_frame(frame: &SseFrame) -> Decoded {
    if frame.event.as_deref() != Some(LOG_EVENT) {
        return Decoded::Ignored;
    }
    match serde_json::from_str::<LogFrame>(&frame.data) {
        Ok(parsed) => Decoded::Log(LogEvent {
            source: parsed.source,
            kind: parsed.kind,
            raw: frame.data.clone(),
        }),
        Err(err) => Decoded::Malformed(err.to_string()),
    }
}

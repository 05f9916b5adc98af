//! Streaming transport - line classification and the lazy message stream
//!
//! The remote service streams newline-delimited lines. Payload lines carry the
//! literal `data:` prefix; the payload is either the literal end token `done`
//! (ignored) or text that may JSON-encode `{"content": ...}` or
//! `{"tool_calls": [...]}`. Classification is total: anything that fails to
//! parse as JSON is treated as a raw text delta rather than an error.
//!
//! Framing is deliberately line-by-line: a JSON object wrapped across several
//! transport lines is not reassembled, so the service must emit one payload
//! per line. `MessageStream` is pulled by the consumer one chunk at a time;
//! each network read is a suspension point and nothing advances the stream in
//! the background.

use futures::Stream;
use serde_json::Value;

use super::client::error_sentinel;
use super::log::{CallLog, ToolCallRecord};

/// Prefix marking a payload line.
pub const DATA_PREFIX: &str = "data:";

/// Literal payload signalling the end of the stream. Ignored, never yielded.
pub const END_TOKEN: &str = "done";

/// Classification of one payload line. Transient; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// Text delta from a parsed `{"content": ...}` payload
    Text(String),
    /// Batch of tool-call entries from a parsed `{"tool_calls": [...]}` payload
    ToolCalls(Vec<Value>),
    /// Raw fallback for payloads that are not JSON
    Raw(String),
}

/// Classify one received line.
///
/// Returns `None` for lines that carry no payload: lines without the `data:`
/// prefix, empty payloads and the end token.
pub fn classify_line(line: &str) -> Option<StreamChunk> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() || payload == END_TOKEN {
        return None;
    }
    Some(classify_payload(payload))
}

/// Total JSON-or-text classification of a non-empty payload.
fn classify_payload(payload: &str) -> StreamChunk {
    match serde_json::from_str::<Value>(payload) {
        Ok(value) => {
            if let Some(calls) = value.get("tool_calls") {
                let entries = calls.as_array().cloned().unwrap_or_default();
                StreamChunk::ToolCalls(entries)
            } else {
                let content = value
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();
                StreamChunk::Text(content)
            }
        }
        Err(_) => StreamChunk::Raw(payload.to_string()),
    }
}

enum StreamState {
    /// Transport stream open, reading lines
    Streaming(reqwest::Response),
    /// A failure occurred; one sentinel fragment is still owed to the consumer
    Failed(String),
    /// Stream exhausted
    Finished,
}

/// Lazy, forward-only sequence of text fragments from one streaming turn.
///
/// Produced by [`RemoteAgent::send_stream`](super::client::RemoteAgent::send_stream).
/// Finite and not restartable. Tool-call fragments discovered along the way
/// are appended to the client's call log and produce no text. Any transport
/// or protocol failure yields exactly one error-sentinel fragment and then
/// the sequence ends; it never returns an error.
pub struct MessageStream<'a> {
    source: String,
    log: &'a mut CallLog,
    state: StreamState,
    buf: Vec<u8>,
    tail: String,
}

impl<'a> MessageStream<'a> {
    pub(crate) fn streaming(source: String, log: &'a mut CallLog, response: reqwest::Response) -> Self {
        Self {
            source,
            log,
            state: StreamState::Streaming(response),
            buf: Vec::new(),
            tail: String::new(),
        }
    }

    pub(crate) fn failed(source: String, log: &'a mut CallLog, message: String) -> Self {
        Self {
            source,
            log,
            state: StreamState::Failed(message),
            buf: Vec::new(),
            tail: String::new(),
        }
    }

    /// Pull the next text fragment.
    ///
    /// Returns `None` once the underlying stream is exhausted. Fragments are
    /// yielded with one trailing space as a join-safe separator; a final
    /// unflushed fragment is yielded without it.
    pub async fn next(&mut self) -> Option<String> {
        loop {
            // Drain complete buffered lines before touching the network.
            if let Some(line) = take_line(&mut self.buf) {
                if let Some(delta) = self.process_line(&line) {
                    return Some(delta);
                }
                continue;
            }

            match std::mem::replace(&mut self.state, StreamState::Finished) {
                StreamState::Finished => return None,
                StreamState::Failed(message) => return Some(message),
                StreamState::Streaming(mut response) => match response.chunk().await {
                    Ok(Some(bytes)) => {
                        self.buf.extend_from_slice(&bytes);
                        self.state = StreamState::Streaming(response);
                    }
                    Ok(None) => {
                        if let Some(delta) = self.finish() {
                            return Some(delta);
                        }
                        return None;
                    }
                    Err(err) => {
                        log::warn!("stream read failed: {}", err);
                        return Some(error_sentinel(err));
                    }
                },
            }
        }
    }

    /// Adapt to a `futures::Stream` for combinator-style consumers.
    pub fn into_stream(self) -> impl Stream<Item = String> + 'a {
        futures::stream::unfold(self, |mut stream| async move {
            stream.next().await.map(|chunk| (chunk, stream))
        })
    }

    /// Handle one complete line; returns the delta to yield, if any.
    fn process_line(&mut self, line: &str) -> Option<String> {
        match classify_line(line)? {
            StreamChunk::ToolCalls(entries) => {
                log::debug!("stream fragment carried {} tool call(s)", entries.len());
                for entry in &entries {
                    self.log.append(ToolCallRecord::from_wire(&self.source, entry));
                }
                None
            }
            StreamChunk::Text(delta) | StreamChunk::Raw(delta) => {
                self.tail.push_str(&delta);
                let out = format!("{} ", self.tail);
                self.tail.clear();
                Some(out)
            }
        }
    }

    /// End of stream: classify a trailing partial line, then flush any
    /// unflushed accumulator without the join space.
    fn finish(&mut self) -> Option<String> {
        let leftover = std::mem::take(&mut self.buf);
        if !leftover.is_empty() {
            let line = String::from_utf8_lossy(&leftover).into_owned();
            if let Some(delta) = self.process_line(line.trim_end_matches('\r')) {
                return Some(delta);
            }
        }
        if !self.tail.trim().is_empty() {
            return Some(std::mem::take(&mut self.tail));
        }
        None
    }
}

/// Split one complete line off the front of the buffer, if present.
fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    let pos = buf.iter().position(|&b| b == b'\n')?;
    let raw: Vec<u8> = buf.drain(..=pos).collect();
    let line = String::from_utf8_lossy(&raw);
    Some(line.trim_end_matches('\n').trim_end_matches('\r').to_string())
}

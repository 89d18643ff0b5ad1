//! Re-framing of a completion backend's event stream.
//!
//! The backend sends newline-delimited `data: <json>` frames ending with
//! `data: [DONE]`, but network chunks do not respect those boundaries and a
//! single JSON payload can even be spread over several `data:` lines.
//! [`RelayStream`] turns the raw byte chunks into lines and [`FrameAssembler`]
//! turns lines into complete, individually parseable payloads.
use bytes::Bytes;
use futures::Stream;
use serde::de::IgnoredAny;
use serde_json::json;
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};

pub const DATA_PREFIX: &str = "data: ";
pub const SENTINEL: &str = "[DONE]";

/// One unit handed to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// A complete JSON document, forwarded verbatim
    Payload(String),
    /// End of stream marker
    Done,
}

impl RelayEvent {
    pub fn data(&self) -> &str {
        match self {
            RelayEvent::Payload(payload) => payload,
            RelayEvent::Done => SENTINEL,
        }
    }

    /// Server-sent event framing of this event
    pub fn to_sse(&self) -> String {
        format!("{}{}\n\n", DATA_PREFIX, self.data())
    }
}

/// The two-item stream sent in place of a relay when the backend cannot be used
pub fn error_events(message: impl Display) -> Vec<RelayEvent> {
    vec![
        RelayEvent::Payload(json!({ "error": message.to_string() }).to_string()),
        RelayEvent::Done,
    ]
}

fn is_complete_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}

/// Line-level state machine joining fragmented `data:` payloads
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: String,
    terminated: bool,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one upstream line (without its line terminator).
    ///
    /// Returns the event completed by this line, if any. Lines after the
    /// sentinel are ignored.
    pub fn push_line(&mut self, line: &str) -> Option<RelayEvent> {
        if self.terminated || line.is_empty() {
            return None;
        }

        let Some(content) = line.strip_prefix(DATA_PREFIX) else {
            tracing::debug!("Skipping non-data line: {}", line);
            return None;
        };

        if content == SENTINEL {
            self.terminated = true;
            return Some(RelayEvent::Done);
        }

        if is_complete_json(content) {
            self.buffer.clear();
            return Some(RelayEvent::Payload(content.to_string()));
        }

        self.buffer.push_str(content);
        if is_complete_json(&self.buffer) {
            return Some(RelayEvent::Payload(std::mem::take(&mut self.buffer)));
        }

        None
    }

    /// Fragment accumulated so far that has not formed a complete payload
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Whether the sentinel has been seen
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// Pull-based relay over a stream of byte chunks.
///
/// Yields payloads as soon as they are complete, then `Done` if the upstream
/// sent the sentinel. The upstream is dropped as soon as the relay terminates,
/// which releases the underlying connection.
pub struct RelayStream<S> {
    upstream: Option<S>,
    line: Vec<u8>,
    assembler: FrameAssembler,
    ready: VecDeque<RelayEvent>,
}

impl<S, E> RelayStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    pub fn new(upstream: S) -> Self {
        Self {
            upstream: Some(upstream),
            line: Vec::new(),
            assembler: FrameAssembler::new(),
            ready: VecDeque::new(),
        }
    }

    /// True once the upstream is released and every event has been handed out
    pub fn is_terminated(&self) -> bool {
        self.upstream.is_none() && self.ready.is_empty()
    }

    /// True when the backend's sentinel has been seen
    pub fn saw_sentinel(&self) -> bool {
        self.assembler.is_terminated()
    }

    fn feed_line(&mut self, raw: &[u8]) {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);
        if let Some(event) = self.assembler.push_line(&line) {
            self.ready.push_back(event);
        }
    }

    fn feed_chunk(&mut self, chunk: &[u8]) {
        let mut rest = chunk;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.line.extend_from_slice(&rest[..pos]);
            let line = std::mem::take(&mut self.line);
            self.feed_line(&line);
            rest = &rest[pos + 1..];
            if self.assembler.is_terminated() {
                return;
            }
        }
        self.line.extend_from_slice(rest);
    }

    fn finish(&mut self) {
        if !self.assembler.is_terminated() && !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            self.feed_line(&line);
        }
        if !self.assembler.is_terminated() && !self.assembler.pending().is_empty() {
            // Lossy: a payload still incomplete at end of stream is discarded
            tracing::warn!(
                "Upstream ended with an incomplete payload, dropping {} bytes",
                self.assembler.pending().len()
            );
        }
        self.upstream = None;
        self.line.clear();
    }
}

impl<S, E> Stream for RelayStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    type Item = RelayEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(event) = this.ready.pop_front() {
                return Poll::Ready(Some(event));
            }

            let Some(upstream) = this.upstream.as_mut() else {
                return Poll::Ready(None);
            };

            let polled = Pin::new(upstream).poll_next(cx);
            match polled {
                Poll::Ready(Some(Ok(chunk))) => {
                    this.feed_chunk(&chunk);
                    if this.assembler.is_terminated() {
                        this.finish();
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    tracing::error!("Upstream stream failed: {}", e);
                    this.finish();
                }
                Poll::Ready(None) => this.finish(),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

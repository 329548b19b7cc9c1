//! Server-Sent Events framing
//!
//! Incremental decoder for `text/event-stream` bodies. Only `data` fields are
//! surfaced; `event`, `id` and `retry` are ignored, as are comment lines.

use tracing::error;

/// Longest line accepted before it is dropped.
pub const DEFAULT_MAX_LINE: usize = 1024 * 1024;

/// Splits a byte stream into event payloads.
///
/// A line longer than the limit is discarded together with the event it
/// belongs to, so a server that never sends a newline cannot grow the
/// buffer without bound.
#[derive(Debug)]
pub struct EventStreamDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
    max_line: usize,
    /// Skipping the remainder of an oversized line
    discarding_line: bool,
    /// Current event lost a line and will not be emitted
    discarding_event: bool,
}

impl Default for EventStreamDecoder {
    fn default() -> Self {
        Self::with_max_line(DEFAULT_MAX_LINE)
    }
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            buffer: Vec::new(),
            data_lines: Vec::new(),
            max_line,
            discarding_line: false,
            discarding_event: false,
        }
    }

    /// Feeds a chunk and returns the payloads of every event it completes.
    ///
    /// Multiple `data` lines in one event are joined with `\n`. Chunks may
    /// split lines (or UTF-8 sequences) anywhere.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut chunk = chunk;
        if self.discarding_line {
            match chunk.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    self.discarding_line = false;
                    chunk = &chunk[pos + 1..];
                }
                None => return Vec::new(),
            }
        }

        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            raw.pop();
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }

            if raw.is_empty() {
                if self.discarding_event {
                    self.discarding_event = false;
                } else if !self.data_lines.is_empty() {
                    events.push(self.data_lines.join("\n"));
                }
                self.data_lines.clear();
                continue;
            }

            if raw.len() > self.max_line {
                self.drop_event(raw.len());
                continue;
            }

            let line = String::from_utf8_lossy(&raw);
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (&line[..], ""),
            };
            if field == "data" && !self.discarding_event {
                self.data_lines.push(value.to_string());
            }
        }

        if self.buffer.len() > self.max_line {
            self.drop_event(self.buffer.len());
            self.buffer.clear();
            self.discarding_line = true;
        }

        events
    }

    fn drop_event(&mut self, line_len: usize) {
        error!(
            line_len,
            max_line = self.max_line,
            "Dropping oversized event-stream line"
        );
        self.data_lines.clear();
        self.discarding_event = true;
    }
}

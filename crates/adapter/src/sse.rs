//! Server-sent event framing.
//!
//! A frame is a run of `field: value` lines ended by a blank line. Handled
//! fields are `event`, `data` (repeatable, joined with `\n`) and `id`; lines
//! starting with `:` are comments. Lines may end in `\n` or `\r\n`, and chunks
//! may split a line (or a UTF-8 sequence) anywhere.

use thiserror::Error;

/// Default event name when a frame has no `event:` field
pub const DEFAULT_EVENT: &str = "message";

/// Longest line the decoder buffers while waiting for its newline
pub const DEFAULT_MAX_LINE_BYTES: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("event stream line exceeds {limit} bytes")]
pub struct LineTooLong {
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

/// Incremental frame decoder
#[derive(Debug)]
pub struct SseDecoder {
    buf: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
    max_line: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self {
            buf: Vec::new(),
            event: None,
            data: Vec::new(),
            id: None,
            max_line: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = max_line;
        self
    }

    /// Feed a chunk; returns every frame it completes.
    ///
    /// Fails once an unterminated line outgrows the limit. The decoder is
    /// reset and the stream should be dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<SseFrame>, LineTooLong> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buf[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            let mut line = &self.buf[start..end];
            if line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }
            let line = String::from_utf8_lossy(line).into_owned();
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
            start = end + 1;
        }
        self.buf.drain(..start);
        if self.buf.len() > self.max_line {
            *self = Self::new().with_max_line(self.max_line);
            return Err(LineTooLong {
                limit: self.max_line,
            });
        }
        Ok(frames)
    }

    /// Bytes or fields received but not yet dispatched
    pub fn has_partial(&self) -> bool {
        !self.buf.is_empty() || !self.data.is_empty() || self.event.is_some()
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            // retry and unknown fields carry nothing the client uses
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame {
            event: event.unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data,
            id: self.id.clone(),
        })
    }
}

/// Encode one frame. Multi-line data becomes several `data:` lines.
pub fn encode_frame(event: &str, data: &str) -> String {
    let mut out = format!("event: {event}\n");
    for line in data.split('\n') {
        out.push_str("data: ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_frames() {
        let mut d = SseDecoder::new();
        let frames = d.feed(b"event: delay\ndata: {\"duration\":5}\n\nevent: x\ndata: y\n\n").unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].event, "delay");
        assert_eq!(frames[0].data, "{\"duration\":5}");
        assert_eq!(frames[1].event, "x");
        assert!(!d.has_partial());
    }

    #[test]
    fn joins_multiline_data_and_handles_crlf() {
        let mut d = SseDecoder::new();
        let frames = d.feed(b"event:a\r\ndata:one\r\ndata: two\r\n\r\n").unwrap();
        assert_eq!(frames[0].data, "one\ntwo");
        assert_eq!(frames[0].event, "a");
    }

    #[test]
    fn comments_and_empty_frames_are_skipped() {
        let mut d = SseDecoder::new();
        assert!(d.feed(b": keep-alive\n\n").unwrap().is_empty());
        assert!(d.feed(b"event: lonely\n\n").unwrap().is_empty());
        let frames = d.feed(b"data: hi\n\n").unwrap();
        assert_eq!(frames[0].event, DEFAULT_EVENT);
    }

    #[test]
    fn survives_arbitrary_chunk_splits() {
        let wire = format!("{}{}", encode_frame("tile_placed", "{\"row\":1}"), encode_frame("é", "ü\nß"));
        let bytes = wire.as_bytes();
        for split in 1..bytes.len() {
            let mut d = SseDecoder::new();
            let mut frames = d.feed(&bytes[..split]).unwrap();
            frames.extend(d.feed(&bytes[split..]).unwrap());
            assert_eq!(frames.len(), 2, "split at {split}");
            assert_eq!(frames[1].event, "é");
            assert_eq!(frames[1].data, "ü\nß");
        }
    }

    #[test]
    fn runaway_line_is_rejected() {
        let mut d = SseDecoder::new().with_max_line(16);
        assert!(d.feed(b"data: short").unwrap().is_empty());
        let err = d.feed(&[b'x'; 32]).unwrap_err();
        assert_eq!(err, LineTooLong { limit: 16 });
        assert!(!d.has_partial());

        // long lines are fine once terminated within a chunk
        let mut d = SseDecoder::new().with_max_line(16);
        let frames = d.feed(format!("data: {}\n\n", "y".repeat(64)).as_bytes()).unwrap();
        assert_eq!(frames[0].data.len(), 64);
    }

    #[test]
    fn id_is_carried() {
        let mut d = SseDecoder::new();
        let frames = d.feed(b"id: 7\ndata: x\n\n").unwrap();
        assert_eq!(frames[0].id.as_deref(), Some("7"));
    }
}

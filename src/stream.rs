//! Incremental decoder for the streamed `/ask` response body.
//!
//! The backend emits frames separated by a blank line, each carrying a
//! `data:` prefixed payload fragment. Chunk boundaries are arbitrary: they
//! can fall mid-frame and even mid-character, so the decoder carries both
//! an undecoded byte tail and an unframed text buffer between chunks.

use tokio_stream::{Stream, StreamExt};

use crate::error::Error;

/// Recognized payload field prefix at the start of a frame.
pub const PAYLOAD_PREFIX: &str = "data:";

/// Separator between two frames in the stream.
pub const FRAME_SEPARATOR: &str = "\n\n";

/// Shown in place of an answer when the stream closes without yielding
/// any payload text.
pub const FALLBACK_ANSWER: &str = "No answer could be generated.";

// ---------------------------------------------------------------------------
// FrameDecoder
// ---------------------------------------------------------------------------

/// Pure incremental frame decoder. Feed it byte chunks in arrival order;
/// it yields payload fragments in the same order, one per complete frame.
///
/// Decoding is lossless and replay-idempotent: the same byte sequence
/// always produces the same fragment sequence, however it is chunked.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes not yet decodable as UTF-8 (at most one partial sequence).
    pending: Vec<u8>,
    /// Decoded text not yet terminated by a frame separator.
    buffer: String,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning the payload fragments of every frame the
    /// chunk completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        self.drain_utf8();
        self.drain_frames()
    }

    /// Flush at end of stream. An unterminated trailing frame still counts;
    /// a dangling partial UTF-8 sequence at EOF is replaced, not dropped.
    pub fn finish(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            let tail = std::mem::take(&mut self.pending);
            self.buffer.push_str(&String::from_utf8_lossy(&tail));
        }
        let rest = std::mem::take(&mut self.buffer);
        parse_frame(&rest)
    }

    /// Decode as much of `pending` as is currently valid UTF-8, keeping an
    /// incomplete trailing sequence for the next chunk. Genuinely invalid
    /// bytes become U+FFFD rather than aborting the stream.
    fn drain_utf8(&mut self) {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    self.buffer.push_str(valid);
                    self.pending.clear();
                    return;
                }
                Err(err) => {
                    let valid_to = err.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid_to]));
                    match err.error_len() {
                        // Incomplete sequence at the tail: wait for more bytes.
                        None => {
                            self.pending.drain(..valid_to);
                            return;
                        }
                        Some(bad) => {
                            self.buffer.push('\u{FFFD}');
                            self.pending.drain(..valid_to + bad);
                        }
                    }
                }
            }
        }
    }

    fn drain_frames(&mut self) -> Vec<String> {
        let mut fragments = Vec::new();
        while let Some(end) = self.buffer.find(FRAME_SEPARATOR) {
            let frame = self.buffer[..end].to_string();
            self.buffer.drain(..end + FRAME_SEPARATOR.len());
            if let Some(fragment) = parse_frame(&frame) {
                fragments.push(fragment);
            }
        }
        fragments
    }
}

/// Extract the payload of one frame: strip the recognized prefix and any
/// leading whitespace, preserving trailing whitespace. Frames without the
/// prefix are ignored.
fn parse_frame(frame: &str) -> Option<String> {
    let frame = frame
        .trim_start_matches(['\r', '\n'])
        .trim_end_matches('\r');
    let payload = frame.strip_prefix(PAYLOAD_PREFIX)?;
    Some(payload.trim_start().to_string())
}

// ---------------------------------------------------------------------------
// Stream driver
// ---------------------------------------------------------------------------

/// Drive a byte stream through a [`FrameDecoder`], invoking `on_fragment`
/// for each payload fragment in arrival order.
///
/// Returns the total number of characters handed to `on_fragment` so the
/// caller can apply the empty-answer fallback. Fragments emitted before a
/// mid-stream error stay emitted; the error itself is returned.
pub async fn decode_stream<S, B, E, F>(mut body: S, mut on_fragment: F) -> Result<usize, Error>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<Error>,
    F: FnMut(&str),
{
    let mut decoder = FrameDecoder::new();
    let mut emitted = 0usize;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Into::into)?;
        for fragment in decoder.push(chunk.as_ref()) {
            emitted += fragment.chars().count();
            on_fragment(&fragment);
        }
    }
    if let Some(fragment) = decoder.finish() {
        emitted += fragment.chars().count();
        on_fragment(&fragment);
    }

    tracing::debug!(chars = emitted, "answer stream closed");
    Ok(emitted)
}

//! Incremental byte-to-line decoder for streamed response bodies.
//!
//! Chunk boundaries from the transport carry no meaning: a boundary may fall
//! inside a line or inside a multi-byte UTF-8 character. The decoder keeps
//! both kinds of fragment until the bytes that complete them arrive.

/// Replacement emitted for byte sequences that can never form valid UTF-8.
const REPLACEMENT: char = '\u{FFFD}';

/// Stateful decoder turning raw byte chunks into complete text lines.
///
/// Lines are split on `\n` only. A trailing `\r` is left in place for the
/// consumer to deal with.
#[derive(Debug, Default)]
pub struct LineDecoder {
    /// Undecoded tail of the last chunk (an incomplete UTF-8 sequence)
    pending_bytes: Vec<u8>,
    /// Text after the last line feed seen so far
    pending_line: String,
}

impl LineDecoder {
    /// Create a new decoder with empty buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every line completed by it.
    ///
    /// Returns an empty vector when the chunk only extends a pending line.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }

        let text = if self.pending_bytes.is_empty() {
            self.decode_utf8(chunk)
        } else {
            let mut combined = std::mem::take(&mut self.pending_bytes);
            combined.extend_from_slice(chunk);
            self.decode_utf8(&combined)
        };

        self.pending_line.push_str(&text);
        self.split_complete_lines()
    }

    /// Flush the decoder at end of stream.
    ///
    /// Returns the final unterminated line if it is non-empty. Both internal
    /// buffers are cleared afterwards.
    pub fn flush(&mut self) -> Option<String> {
        if !self.pending_bytes.is_empty() {
            // An incomplete sequence at true end of stream can never be completed
            self.pending_bytes.clear();
            self.pending_line.push(REPLACEMENT);
        }

        let line = std::mem::take(&mut self.pending_line);
        if line.is_empty() {
            None
        } else {
            Some(line)
        }
    }

    /// Discard all buffered state
    pub fn reset(&mut self) {
        self.pending_bytes.clear();
        self.pending_line.clear();
    }

    /// Whether any bytes or text are still buffered
    pub fn has_pending(&self) -> bool {
        !self.pending_bytes.is_empty() || !self.pending_line.is_empty()
    }

    /// Number of undecoded bytes held back for an incomplete character
    pub fn pending_byte_count(&self) -> usize {
        self.pending_bytes.len()
    }

    /// Decode as much of `bytes` as forms complete characters.
    ///
    /// An incomplete sequence at the very end is stashed in `pending_bytes`;
    /// invalid sequences elsewhere are replaced with U+FFFD.
    fn decode_utf8(&mut self, mut bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());

        loop {
            match std::str::from_utf8(bytes) {
                Ok(valid) => {
                    out.push_str(valid);
                    return out;
                }
                Err(err) => {
                    let (valid, rest) = bytes.split_at(err.valid_up_to());
                    // prefix up to `valid_up_to` is always valid UTF-8
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());

                    match err.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            bytes = &rest[len..];
                        }
                        None => {
                            // Truncated sequence: wait for the next chunk
                            self.pending_bytes.extend_from_slice(rest);
                            return out;
                        }
                    }
                }
            }
        }
    }

    /// Split off every `\n`-terminated line from `pending_line`
    fn split_complete_lines(&mut self) -> Vec<String> {
        let Some(last_newline) = self.pending_line.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.pending_line.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending_line, rest);

        // `complete` ends with '\n', so drop the empty tail from split
        let mut lines: Vec<String> = complete.split('\n').map(str::to_string).collect();
        lines.pop();
        lines
    }
}

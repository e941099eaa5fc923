//! Line framing for the message feed.
//!
//! Line format:
//! - TEXT (0-160 bytes): UTF-8 message body
//! - LF (1 byte): terminates the line, CR is ignored anywhere
//!
//! An `END_OF_STREAM` byte (0x04, ASCII EOT, by default) ends the feed.

use heapless::{String, Vec};

/// Maximum message length in bytes (after framing)
pub const MAX_LINE_LEN: usize = 160;

/// Default end-of-stream byte (ASCII EOT, what a terminal sends for Ctrl-D)
pub const END_OF_STREAM: u8 = 0x04;

/// Text carried by one line
pub type LineText = String<MAX_LINE_LEN>;

/// Replacement for bytes that are not valid UTF-8
const REPLACEMENT: char = '?';

/// A complete unit produced by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A complete line. Empty text means "blank the display".
    Message(LineText),
    /// The producer closed the stream. Carries any unterminated trailing text.
    EndOfStream(Option<LineText>),
}

impl Line {
    /// Returns true if this line asks for the display to be blanked
    pub fn is_clear(&self) -> bool {
        matches!(self, Line::Message(text) if text.is_empty())
    }

    /// Returns true if this is the end of the feed
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Line::EndOfStream(_))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Line {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Line::Message(text) => defmt::write!(f, "Message({=str})", text.as_str()),
            Line::EndOfStream(Some(text)) => {
                defmt::write!(f, "EndOfStream({=str})", text.as_str())
            }
            Line::EndOfStream(None) => defmt::write!(f, "EndOfStream"),
        }
    }
}

/// Byte-at-a-time line assembler
#[derive(Debug, Clone)]
pub struct LineParser {
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// Current line overflowed the buffer; remaining bytes are dropped
    truncated: bool,
    end_of_stream: u8,
    truncated_lines: u32,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a parser using the default end-of-stream byte
    pub fn new() -> Self {
        Self::with_end_of_stream(END_OF_STREAM)
    }

    /// Create a parser that ends the stream on `byte`
    pub fn with_end_of_stream(byte: u8) -> Self {
        Self {
            buffer: Vec::new(),
            truncated: false,
            end_of_stream: byte,
            truncated_lines: 0,
        }
    }

    /// Discard any partially received line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.truncated = false;
    }

    /// Number of lines that were cut to `MAX_LINE_LEN`
    pub fn truncated_lines(&self) -> u32 {
        self.truncated_lines
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Some(line)` when a line is complete or the stream ended,
    /// `None` when more bytes are needed.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        if byte == self.end_of_stream {
            let trailing = self.take_line();
            return Some(Line::EndOfStream((!trailing.is_empty()).then_some(trailing)));
        }

        match byte {
            b'\r' => None,
            b'\n' => Some(Line::Message(self.take_line())),
            _ => {
                if self.buffer.push(byte).is_err() && !self.truncated {
                    self.truncated = true;
                    self.truncated_lines = self.truncated_lines.saturating_add(1);
                }
                None
            }
        }
    }

    /// Decode and clear the buffered line
    fn take_line(&mut self) -> LineText {
        let bytes = if self.truncated {
            complete_prefix(&self.buffer)
        } else {
            &self.buffer[..]
        };
        let text = decode_lossy(bytes);
        self.reset();
        text
    }
}

/// Decode bytes, replacing invalid sequences, and strip surrounding whitespace
fn decode_lossy(bytes: &[u8]) -> LineText {
    let mut decoded = LineText::new();
    'chunks: for chunk in bytes.utf8_chunks() {
        for ch in chunk.valid().chars() {
            if decoded.push(ch).is_err() {
                break 'chunks;
            }
        }
        if !chunk.invalid().is_empty() && decoded.push(REPLACEMENT).is_err() {
            break;
        }
    }

    let trimmed = decoded.trim();
    if trimmed.len() == decoded.len() {
        return decoded;
    }
    let mut text = LineText::new();
    // Cannot fail: trimmed is a sub-slice of a string of the same capacity
    let _ = text.push_str(trimmed);
    text
}

/// Drop a multi-byte sequence cut short by truncation
fn complete_prefix(bytes: &[u8]) -> &[u8] {
    let mut start = bytes.len();
    while start > 0 && bytes.len() - start < 3 && bytes[start - 1] & 0xC0 == 0x80 {
        start -= 1;
    }
    if start == 0 {
        return bytes;
    }

    let lead = start - 1;
    let needed = match bytes[lead] {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return bytes,
    };

    if bytes.len() - lead < needed {
        &bytes[..lead]
    } else {
        bytes
    }
}

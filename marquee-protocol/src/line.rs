//! Byte-fed request line assembly
//!
//! The control link delivers requests as newline-terminated lines. `\r` is
//! ignored so both `\n` and `\r\n` endings work. A line that overflows the
//! buffer is discarded up to its terminating newline and reported once.

use heapless::{String, Vec};

use crate::args::ProtocolError;
use crate::messages::MAX_LINE_LEN;

/// A complete request line
pub type Line = String<MAX_LINE_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// Collecting bytes of the current line
    Collecting,
    /// Current line overflowed; dropping bytes until newline
    Discarding,
}

/// State machine assembling request lines from a byte stream
#[derive(Debug, Clone)]
pub struct LineParser {
    state: LineState,
    buffer: Vec<u8, MAX_LINE_LEN>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self {
            state: LineState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.state = LineState::Collecting;
        self.buffer.clear();
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a non-empty line completes, `Ok(None)`
    /// when more bytes are needed, or `Err` when a line overflowed or was not
    /// valid UTF-8.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, ProtocolError> {
        match (self.state, byte) {
            (LineState::Discarding, b'\n') => {
                self.reset();
                Ok(None)
            }
            (LineState::Discarding, _) => Ok(None),
            (LineState::Collecting, b'\r') => Ok(None),
            (LineState::Collecting, b'\n') => {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let bytes = core::mem::take(&mut self.buffer);
                String::from_utf8(bytes)
                    .map(Some)
                    .map_err(|_| ProtocolError::Malformed)
            }
            (LineState::Collecting, _) => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = LineState::Discarding;
                    return Err(ProtocolError::LineTooLong);
                }
                Ok(None)
            }
        }
    }
}

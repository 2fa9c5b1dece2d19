//! Query-string argument decoding
//!
//! Arguments are `key=value` pairs joined by `&`. Values are percent-decoded
//! and `+` decodes to a space. Lookups return the first matching key.

use core::fmt;

use heapless::{String, Vec};

use crate::color::Rgb;

/// Largest decoded argument value accepted
pub const MAX_ARG_LEN: usize = 96;

/// Errors raised while decoding a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// A required argument is absent
    MissingArgument(&'static str),
    /// An argument is present but cannot be decoded as the expected type
    InvalidArgument(&'static str),
    /// An argument value exceeds its capacity
    TooLong(&'static str),
    /// The request path names no known verb
    UnknownVerb,
    /// The request line is not shaped like a request target
    Malformed,
    /// The request line exceeds the line buffer
    LineTooLong,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MissingArgument(_) => f.write_str("Missing arguments"),
            ProtocolError::InvalidArgument(key) => write!(f, "Invalid {}", key),
            ProtocolError::TooLong(key) => write!(f, "{} too long", key),
            ProtocolError::UnknownVerb => f.write_str("Not found"),
            ProtocolError::Malformed => f.write_str("Malformed request"),
            ProtocolError::LineTooLong => f.write_str("Request too long"),
        }
    }
}

/// Borrowed view over a raw query string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Args<'a> {
    query: &'a str,
}

impl<'a> Args<'a> {
    /// Wrap the part of a request after `?`
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }

    /// Iterate raw `(key, value)` pairs, skipping empty segments
    pub fn pairs(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.split_once('=').unwrap_or((segment, "")))
    }

    /// Raw (still encoded) value of the first `key`
    pub fn raw(&self, key: &str) -> Option<&'a str> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Whether `key` is present at all, even with an empty value
    pub fn has(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Decoded text value, `None` if absent
    pub fn text<const N: usize>(
        &self,
        key: &'static str,
    ) -> Result<Option<String<N>>, ProtocolError> {
        match self.raw(key) {
            Some(raw) => percent_decode(raw, key).map(Some),
            None => Ok(None),
        }
    }

    /// Decoded text value that must be present
    pub fn require_text<const N: usize>(
        &self,
        key: &'static str,
    ) -> Result<String<N>, ProtocolError> {
        self.text(key)?.ok_or(ProtocolError::MissingArgument(key))
    }

    /// Signed integer value, `None` if absent
    pub fn int(&self, key: &'static str) -> Result<Option<i64>, ProtocolError> {
        let Some(value) = self.text::<MAX_ARG_LEN>(key)? else {
            return Ok(None);
        };
        value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ProtocolError::InvalidArgument(key))
    }

    /// Integer value that must be present
    pub fn require_int(&self, key: &'static str) -> Result<i64, ProtocolError> {
        self.int(key)?.ok_or(ProtocolError::MissingArgument(key))
    }

    /// Finite decimal value, `None` if absent
    pub fn number(&self, key: &'static str) -> Result<Option<f32>, ProtocolError> {
        let Some(value) = self.text::<MAX_ARG_LEN>(key)? else {
            return Ok(None);
        };
        match value.trim().parse::<f32>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(ProtocolError::InvalidArgument(key)),
        }
    }

    /// Hex color value, `None` if absent
    pub fn color(&self, key: &'static str) -> Result<Option<Rgb>, ProtocolError> {
        let Some(value) = self.text::<MAX_ARG_LEN>(key)? else {
            return Ok(None);
        };
        Rgb::from_hex(value.trim())
            .map(Some)
            .ok_or(ProtocolError::InvalidArgument(key))
    }

    /// Hex color value that must be present
    pub fn require_color(&self, key: &'static str) -> Result<Rgb, ProtocolError> {
        self.color(key)?.ok_or(ProtocolError::MissingArgument(key))
    }
}

/// Percent-decode `raw` into a bounded string
///
/// `key` names the argument in any error returned.
pub fn percent_decode<const N: usize>(
    raw: &str,
    key: &'static str,
) -> Result<String<N>, ProtocolError> {
    let mut bytes: Vec<u8, N> = Vec::new();
    let input = raw.as_bytes();
    let mut i = 0;

    while i < input.len() {
        let byte = match input[i] {
            b'+' => b' ',
            b'%' => {
                let hi = input.get(i + 1).and_then(|b| hex_value(*b));
                let lo = input.get(i + 2).and_then(|b| hex_value(*b));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        i += 2;
                        (hi << 4) | lo
                    }
                    _ => return Err(ProtocolError::InvalidArgument(key)),
                }
            }
            other => other,
        };
        bytes.push(byte).map_err(|_| ProtocolError::TooLong(key))?;
        i += 1;
    }

    String::from_utf8(bytes).map_err(|_| ProtocolError::InvalidArgument(key))
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

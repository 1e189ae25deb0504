use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A byte signature with wildcard positions.
///
/// Parsed once from an IDA-style mask (`"48 8B 05 ?? ?? ?? ??"`) so scans
/// never re-read the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    bytes: Vec<Option<u8>>,
    anchor: Option<usize>,
}

impl Pattern {
    /// Parse a whitespace separated mask. `?` and `??` are wildcards.
    pub fn parse(mask: &str) -> Result<Self> {
        let mut bytes = Vec::new();
        for token in mask.split_whitespace() {
            if token == "??" || token == "?" {
                bytes.push(None);
                continue;
            }

            if token.len() > 2 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(Error::InvalidPattern(format!(
                    "Invalid pattern token '{}'",
                    token
                )));
            }

            let value = u8::from_str_radix(token, 16).map_err(|e| {
                Error::InvalidPattern(format!("Invalid pattern token '{}': {}", token, e))
            })?;
            bytes.push(Some(value));
        }

        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<Option<u8>>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidPattern("Pattern is empty".to_string()));
        }

        let anchor = bytes.iter().position(Option::is_some);
        Ok(Self { bytes, anchor })
    }

    /// Exact byte sequence without wildcards.
    pub fn from_literal(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes.iter().copied().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn tokens(&self) -> &[Option<u8>] {
        &self.bytes
    }

    /// First concrete byte and its index, used to skip ahead with `memchr`.
    pub fn anchor(&self) -> Option<(usize, u8)> {
        self.anchor.and_then(|i| self.bytes[i].map(|b| (i, b)))
    }

    pub fn is_wildcard_only(&self) -> bool {
        self.anchor.is_none()
    }

    /// Compare against a window of exactly `self.len()` bytes.
    pub fn matches(&self, window: &[u8]) -> bool {
        window.len() == self.bytes.len()
            && self
                .bytes
                .iter()
                .zip(window)
                .all(|(token, byte)| token.is_none_or(|value| value == *byte))
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match token {
                Some(value) => write!(f, "{:02X}", value)?,
                None => f.write_str("??")?,
            }
        }
        Ok(())
    }
}

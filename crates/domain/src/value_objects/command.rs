//! Protocol command value objects
//!
//! A rule's command filter is normalized once, when the rule is built, into
//! a [`MarshaledCommand`]: surrounding whitespace and CR/LF framing removed,
//! ASCII letters uppercased. Live requests are compared against it without
//! allocating.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::{CommandFilter, extract_command, marshal_command};
//!
//! assert_eq!(marshal_command("\r\nget\r\n").as_bytes(), b"GET");
//!
//! let filter = CommandFilter::new("GET");
//! assert!(filter.matches(extract_command(b"\r\nget\r\nkey1")));
//! assert!(!filter.matches(extract_command(b"\r\nKEYS\r\nkey1")));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized byte form of a protocol command token
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MarshaledCommand(Vec<u8>);

impl MarshaledCommand {
    /// Normalize raw command bytes
    pub fn from_bytes(raw: &[u8]) -> Self {
        Self(raw.trim_ascii().to_ascii_uppercase())
    }

    /// Normalized bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether nothing is left after normalization
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compare against an unnormalized request token
    ///
    /// Equivalent to `MarshaledCommand::from_bytes(token) == *self`.
    pub fn matches_token(&self, token: &[u8]) -> bool {
        token.trim_ascii().eq_ignore_ascii_case(&self.0)
    }
}

impl fmt::Display for MarshaledCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Normalize a command string: trim whitespace/CR/LF, uppercase
pub fn marshal_command(raw: &str) -> MarshaledCommand {
    MarshaledCommand::from_bytes(raw.as_bytes())
}

/// Extract the command token from a raw request
///
/// The request is split on CR/LF. Empty segments and multi-bulk framing
/// headers (`*<count>`, `$<len>`) are skipped, and the first
/// whitespace-delimited token of the next segment is the command. Without
/// any CR/LF this is simply the first token of an inline request.
///
/// Returns `None` when the input holds no usable token.
pub fn extract_command(raw: &[u8]) -> Option<&[u8]> {
    raw.split(|b| *b == b'\r' || *b == b'\n')
        .map(<[u8]>::trim_ascii)
        .filter(|segment| !segment.is_empty())
        .find(|segment| !is_framing_header(segment))
        .and_then(|segment| {
            segment
                .split(u8::is_ascii_whitespace)
                .find(|token| !token.is_empty())
        })
}

fn is_framing_header(segment: &[u8]) -> bool {
    matches!(segment.first(), Some(b'*' | b'$'))
}

/// Command predicate of a rule
///
/// Holds the configured command next to its marshaled form. Both are set
/// together at construction and cannot diverge afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandFilter {
    raw: String,
    marshaled: MarshaledCommand,
}

impl CommandFilter {
    /// Filter that matches every command
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter for a single command (case-insensitive)
    ///
    /// A blank command behaves like [`CommandFilter::any`].
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let marshaled = marshal_command(&raw);
        Self { raw, marshaled }
    }

    /// The command as configured
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The normalized command
    pub fn marshaled(&self) -> &MarshaledCommand {
        &self.marshaled
    }

    /// Whether the filter accepts every command
    pub fn is_any(&self) -> bool {
        self.marshaled.is_empty()
    }

    /// Recompute the marshaled form from the configured command
    #[must_use]
    pub fn remarshaled(&self) -> Self {
        Self::new(self.raw.clone())
    }

    /// Check an extracted request token against this filter
    ///
    /// A missing token only matches the catch-all filter.
    pub fn matches(&self, token: Option<&[u8]>) -> bool {
        if self.is_any() {
            return true;
        }
        token.is_some_and(|t| self.marshaled.matches_token(t))
    }
}

impl Serialize for CommandFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for CommandFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self::new(String::deserialize(deserializer)?))
    }
}

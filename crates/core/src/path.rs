//! Dotted field paths for Mimosa documents.
//!
//! A `Path` names a value inside a document by a chain of object fields,
//! e.g. `user.profile.name`. The accepted alphabet is deliberately narrow:
//! word characters (ASCII alphanumeric and `_`), `$`, and the `.` separator.
//! Any other character rejects the whole string at parse time.

use crate::value::Value;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// A parsed dotted field path.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    raw: String,
    segments: Vec<String>,
}

/// Error type for path parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl Path {
    /// Parses a dotted path from a string.
    ///
    /// Accepts only `[A-Za-z0-9_$.]`; the first offending character fails
    /// the parse with its position.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        for (position, c) in input.char_indices() {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.') {
                return Err(ParseError::new(
                    alloc::format!("Invalid character '{}' in path", c),
                    position,
                ));
            }
        }
        Ok(Self {
            raw: input.to_string(),
            segments: input.split('.').map(|s| s.to_string()).collect(),
        })
    }

    /// Returns the original path string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the path's segments in traversal order.
    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolves this path against a plain value.
    ///
    /// Walks object fields segment by segment; a missing field or a
    /// non-object step yields `None`. This is the untracked accessor; the
    /// reactive crate performs its own traversal through instrumented reads.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

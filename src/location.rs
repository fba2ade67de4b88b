//! # Location
//!
//! Data to locate a position in a piece of text.
//! The main struct is [`Location`].

use serde::{Deserialize, Serialize};
use std::fmt;


/// # Summary
///
/// Information about a position in a text, stored as `(line, char)`.
/// Both components count from zero; they are displayed 1-based.
///
/// # Example
///
/// ```text
/// abc def
/// ghi
/// ```
///
/// Here, the `Location` of `a` is `(0, 0)`,
/// and the one of `i` is `(1, 2)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    line: usize,
    char: usize,
}

impl Location {
    pub fn new(line: usize, char: usize) -> Self {
        Self { line, char }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn char(&self) -> usize {
        self.char
    }

    /// Move the location past `text`, where `newline` is the line terminator.
    pub fn advance(&mut self, text: &str, newline: &str) {
        let mut rest = text;
        while !rest.is_empty() {
            if !newline.is_empty() && rest.starts_with(newline) {
                self.line += 1;
                self.char = 0;
                rest = &rest[newline.len()..];
            } else {
                let mut chars = rest.chars();
                chars.next();
                self.char += 1;
                rest = chars.as_str();
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, character {}", self.line + 1, self.char + 1)
    }
}

/// Return the `line`-th line of `text` (without its terminator), or an empty
/// string past the end.
pub fn line_of<'a>(text: &'a str, line: usize, newline: &str) -> &'a str {
    if newline.is_empty() {
        return if line == 0 { text } else { "" };
    }
    text.split(newline).nth(line).unwrap_or("")
}

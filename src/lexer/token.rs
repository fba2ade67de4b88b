use crate::location::Location;
use serde::{Deserialize, Serialize};
use std::fmt;


/// # Summary
///
/// `Token` is an immutable classified span of input text. It contains
///  - `line` and `char`: where the lexeme starts (both zero-based);
///  - `value`: the decoded lexeme;
///  - `type`: the specific rule that produced it, e.g. `if`;
///  - `group`: its broad category, e.g. `keyword`.
///
/// Two tokens compare equal when their value, type and group are equal,
/// whatever their position.
#[derive(Clone, Serialize, Deserialize)]
pub struct Token {
    line: usize,
    char: usize,
    #[serde(rename = "t_group")]
    group: String,
    #[serde(rename = "t_type")]
    token_type: String,
    value: String,
}

impl Token {
    /// Build a new token.
    pub fn new(
        location: Location,
        value: impl Into<String>,
        token_type: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            line: location.line(),
            char: location.char(),
            group: group.into(),
            token_type: token_type.into(),
            value: value.into(),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn char(&self) -> usize {
        self.char
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.char)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Return the name of the rule which produced the token.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Return whether the token belongs to the given group and type. `None`
    /// stands for any group (or any type).
    pub fn is(&self, group: Option<&str>, token_type: Option<&str>) -> bool {
        group.map_or(true, |group| group == self.group)
            && token_type.map_or(true, |token_type| token_type == self.token_type)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.token_type == other.token_type
            && self.group == other.group
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}({}.{}) :: {}",
            self.group, self.token_type, self.line, self.char, self.value
        )
    }
}

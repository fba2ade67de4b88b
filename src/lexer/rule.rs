use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;


/// Whether `string` is made only of identifier characters.
pub(crate) fn is_identifier_like(string: &str) -> bool {
    !string.is_empty() && string.chars().all(is_identifier_char)
}

pub(crate) fn is_identifier_char(chr: char) -> bool {
    chr.is_ascii_alphanumeric() || chr == '_'
}

/// The two kinds of lexer rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    String,
    Regex,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Regex => f.write_str("regex"),
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Literal { word: bool },
    Regex(Regex),
}

/// # Summary
///
/// A `Rule` recognises a prefix of the remaining input as the lexeme of a
/// token. Tokens it produces take its `name` as type and its `group` as
/// group.
///
/// There are two kinds of rules:
///  - string rules match a literal pattern. When that literal looks like an
///    identifier, the following character must not be an identifier
///    character, so that `if` does not match the start of `ifstream`;
///  - regex rules match a regular expression anchored at the current
///    position.
///
/// Rules are compared by kind, pattern, name and group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RuleDefinition", into = "RuleDefinition")]
pub struct Rule {
    kind: RuleKind,
    pattern: String,
    name: String,
    group: String,
    matcher: Matcher,
}

/// The plain data a [`Rule`] is built from, and dumped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub kind: RuleKind,
    pub pattern: String,
    pub name: String,
    pub group: String,
}

impl Rule {
    /// Build a rule. `group` defaults to `name`.
    pub fn new(
        kind: RuleKind,
        pattern: impl Into<String>,
        name: impl Into<String>,
        group: Option<&str>,
    ) -> Result<Self> {
        let pattern = pattern.into();
        let name = name.into();
        if pattern.is_empty() {
            return Err(Error::EmptyRule { name });
        }
        let group = match group {
            Some(group) if !group.is_empty() => group.to_string(),
            _ => name.clone(),
        };
        let matcher = match kind {
            RuleKind::String => Matcher::Literal {
                word: is_identifier_like(&pattern),
            },
            RuleKind::Regex => {
                let anchored = format!("^(?:{})", pattern);
                Matcher::Regex(Regex::new(&anchored).map_err(|error| Error::InvalidRegex {
                    name: name.clone(),
                    message: error.to_string(),
                })?)
            }
        };
        Ok(Self {
            kind,
            pattern,
            name,
            group,
            matcher,
        })
    }

    /// Build a string rule.
    pub fn string(
        pattern: impl Into<String>,
        name: impl Into<String>,
        group: Option<&str>,
    ) -> Result<Self> {
        Self::new(RuleKind::String, pattern, name, group)
    }

    /// Build a regex rule.
    pub fn regex(
        pattern: impl Into<String>,
        name: impl Into<String>,
        group: Option<&str>,
    ) -> Result<Self> {
        Self::new(RuleKind::Regex, pattern, name, group)
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Return the lexeme this rule recognises at the start of `input`, if any.
    pub fn find<'a>(&self, input: &'a str) -> Option<&'a str> {
        match &self.matcher {
            Matcher::Literal { word } => {
                let rest = input.strip_prefix(self.pattern.as_str())?;
                if *word && rest.chars().next().map_or(false, is_identifier_char) {
                    None
                } else {
                    Some(&input[..self.pattern.len()])
                }
            }
            Matcher::Regex(regex) => regex
                .find(input)
                .filter(|found| found.start() == 0 && found.end() > 0)
                .map(|found| found.as_str()),
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.pattern == other.pattern
            && self.name == other.name
            && self.group == other.group
    }
}

impl Eq for Rule {}

impl TryFrom<RuleDefinition> for Rule {
    type Error = Error;

    fn try_from(definition: RuleDefinition) -> Result<Self> {
        Self::new(
            definition.kind,
            definition.pattern,
            definition.name,
            Some(&definition.group),
        )
    }
}

impl From<Rule> for RuleDefinition {
    fn from(rule: Rule) -> Self {
        Self {
            kind: rule.kind,
            pattern: rule.pattern,
            name: rule.name,
            group: rule.group,
        }
    }
}

use crate::location::Location;
use std::fmt;
use thiserror::Error;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_rendering() {
        let diagnostic = Diagnostic::new(
            "unrecognised input",
            Location::new(0, 0),
            "$$$",
        );
        assert_eq!(
            diagnostic.to_string(),
            "unrecognised input at line 1, character 1\n$$$\n^"
        );

        let diagnostic = Diagnostic::new(
            "unrecognised input",
            Location::new(2, 6),
            "answer$ = 42",
        );
        assert_eq!(
            diagnostic.to_string(),
            "unrecognised input at line 3, character 7\nanswer$ = 42\n------^"
        );
    }

    #[test]
    fn error_display() {
        let error = Error::Lex(Diagnostic::new(
            "unterminated string",
            Location::new(0, 4),
            "s = 'abc",
        ));
        assert_eq!(
            error.to_string(),
            "lexing error: unterminated string at line 1, character 5\ns = 'abc\n----^"
        );
        assert_eq!(
            Error::EmptyRule {
                name: String::from("if")
            }
            .to_string(),
            "cannot build rule `if` from an empty pattern"
        );
    }
}

/// # Summary
///
/// A located, human-readable report about a piece of source text.
///
/// It renders as a three-line block: the message with the 1-based line and
/// character, the offending source line verbatim, and a caret pointing at
/// the exact column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    location: Location,
    source_line: String,
}

impl Diagnostic {
    pub fn new(
        message: impl Into<String>,
        location: Location,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            location,
            source_line: source_line.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn source_line(&self) -> &str {
        &self.source_line
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at {}", self.message, self.location)?;
        writeln!(f, "{}", self.source_line)?;
        write!(f, "{}^", "-".repeat(self.location.char()))
    }
}

/// # Summary
///
/// `Error` enumerates everything that can go wrong while building rules,
/// lexing, importing rule definitions or matching patterns.
///
/// Ordinary pattern mismatches are not errors: they are reported through the
/// `(matched, count)` result of the matcher.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot build rule `{name}` from an empty pattern")]
    EmptyRule { name: String },
    #[error("invalid regular expression for rule `{name}`: {message}")]
    InvalidRegex { name: String, message: String },
    #[error("lexing error: {0}")]
    Lex(Diagnostic),
    #[error("syntax error: {0}")]
    Syntax(Diagnostic),
    #[error("end of token stream reached before a `+` node could match")]
    EndOfTokenStream,
    #[error("unknown lexer flag `{0}`")]
    UnknownFlag(String),
    #[error("lexer flag `{name}` expects a {expected} value")]
    FlagType { name: String, expected: &'static str },
    #[error("unknown error policy `{0}` (expected throw, save or drop)")]
    UnknownPolicy(String),
    #[error("invalid pattern: {0}")]
    Pattern(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Binary(#[from] bincode::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Return the diagnostic carried by located errors.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Lex(diagnostic) | Self::Syntax(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

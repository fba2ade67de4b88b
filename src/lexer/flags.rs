use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;


/// Names of the recognised flags, in their canonical (hyphenated) spelling.
pub const FLAG_NAMES: [&str; 5] = [
    "string-single",
    "string-double",
    "string-dbl-triple",
    "string-sgl-triple",
    "newline",
];

/// A value given to a lexer flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// # Summary
///
/// Options of a [`Lexer`](super::Lexer) that persist across inputs.
///
/// Each `string_*` flag enables one quoting style; `newline` is the
/// sequence treated as a line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Flags {
    pub string_single: bool,
    pub string_double: bool,
    pub string_dbl_triple: bool,
    pub string_sgl_triple: bool,
    pub newline: String,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            string_single: true,
            string_double: true,
            string_dbl_triple: false,
            string_sgl_triple: false,
            newline: String::from("\n"),
        }
    }
}

impl Flags {
    fn switch(&mut self, name: &str) -> Option<&mut bool> {
        match name {
            "string-single" => Some(&mut self.string_single),
            "string-double" => Some(&mut self.string_double),
            "string-dbl-triple" => Some(&mut self.string_dbl_triple),
            "string-sgl-triple" => Some(&mut self.string_sgl_triple),
            _ => None,
        }
    }

    /// Set a flag by name. Underscores in `name` stand for hyphens.
    pub fn set(&mut self, name: &str, value: FlagValue) -> Result<()> {
        let canonical = name.replace('_', "-");
        if canonical == "newline" {
            return match value {
                FlagValue::Str(newline) if !newline.is_empty() => {
                    self.newline = newline;
                    Ok(())
                }
                _ => Err(Error::FlagType {
                    name: canonical,
                    expected: "string",
                }),
            };
        }
        let Some(switch) = self.switch(&canonical) else {
            return Err(Error::UnknownFlag(name.to_string()));
        };
        match value {
            FlagValue::Bool(value) => {
                *switch = value;
                Ok(())
            }
            FlagValue::Str(_) => Err(Error::FlagType {
                name: canonical,
                expected: "boolean",
            }),
        }
    }

    /// Read a flag by name. Underscores in `name` stand for hyphens.
    pub fn get(&self, name: &str) -> Option<FlagValue> {
        let canonical = name.replace('_', "-");
        match canonical.as_str() {
            "newline" => Some(FlagValue::Str(self.newline.clone())),
            "string-single" => Some(FlagValue::Bool(self.string_single)),
            "string-double" => Some(FlagValue::Bool(self.string_double)),
            "string-dbl-triple" => Some(FlagValue::Bool(self.string_dbl_triple)),
            "string-sgl-triple" => Some(FlagValue::Bool(self.string_sgl_triple)),
            _ => None,
        }
    }
}

/// What the lexer does with input no rule recognises.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abort tokenization with a [`Error::Lex`].
    #[default]
    Throw,
    /// Emit the unrecognised run as a `tartak:invalid` token.
    Save,
    /// Skip the unrecognised run.
    Drop,
}

impl FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(policy: &str) -> Result<Self> {
        match policy {
            "throw" => Ok(Self::Throw),
            "save" => Ok(Self::Save),
            "drop" => Ok(Self::Drop),
            other => Err(Error::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Throw => "throw",
            Self::Save => "save",
            Self::Drop => "drop",
        })
    }
}

/// Per-call options of [`Lexer::tokenize`](super::Lexer::tokenize).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Also emit line-leading whitespace into the significant stream.
    pub indent: bool,
    pub errors: ErrorPolicy,
}

impl TokenizeOptions {
    pub fn new(indent: bool, errors: ErrorPolicy) -> Self {
        Self { indent, errors }
    }
}

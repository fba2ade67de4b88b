//! Reading and writing lexer definitions in the rule language.
//!
//! ```text
//! # Comments run to the end of the line.
//! flag string_sgl_triple = true;
//! flag newline = "\n";
//! token string keyword:if = "if";
//! token regex name = "[A-Za-z_][A-Za-z0-9_]*";
//! ```
//!
//! The language is read with a [`Lexer`] configured for it, and statements
//! are recognised with the pattern matcher of [`crate::parser`].

use super::strings::quote;
use super::{FlagValue, Lexer, Rule, RuleKind, TokenizeOptions, FLAG_NAMES};
use crate::error::{Diagnostic, Error, Result};
use crate::location::{self, Location};
use crate::parser::{consume, matches, Node, Pattern, Quantifier};
use crate::stream::TokenStream;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;


const COMMENT_GROUP: &str = "comment";

/// The lexer of the rule language.
fn definition_lexer() -> Result<Lexer> {
    let mut lexer = Lexer::new();
    lexer
        .append(Rule::regex("#[^\n]*", "comment", Some(COMMENT_GROUP))?)
        // Hyphenated names first, so that `string-single` is not read as `string`.
        .append(Rule::regex(
            "[A-Za-z_][A-Za-z0-9_]*(-[A-Za-z0-9_]+)+",
            "name",
            None,
        )?)
        .append(Rule::string("token", "token", Some("keyword"))?)
        .append(Rule::string("flag", "flag", Some("keyword"))?)
        .append(Rule::string("string", "string", Some("kind"))?)
        .append(Rule::string("regex", "regex", Some("kind"))?)
        .append(Rule::string("true", "true", Some("boolean"))?)
        .append(Rule::string("false", "false", Some("boolean"))?)
        .append(Rule::regex("[A-Za-z_][A-Za-z0-9_]*", "name", None)?)
        .append(Rule::string("=", "assign", Some("punctuation"))?)
        .append(Rule::string(":", "colon", Some("punctuation"))?)
        .append(Rule::string(";", "semicolon", Some("punctuation"))?);
    Ok(lexer)
}

/// Any word, keywords of the language included.
fn word() -> Result<Node> {
    Node::alternative(
        ["name:", "keyword:", "kind:", "boolean:"]
            .into_iter()
            .map(Node::identifier)
            .collect::<Result<_>>()?,
    )
}

/// `token (string|regex) [group:]name = "pattern";`
fn token_statement() -> Result<Pattern> {
    Ok(Pattern::new(vec![
        Node::identifier("keyword:token")?,
        Node::identifier("kind:")?,
        word()?,
        Node::group(vec![Node::identifier("colon")?, word()?])?.with(Quantifier::Optional),
        Node::identifier("assign")?,
        Node::identifier("string:")?,
        Node::identifier("semicolon")?,
    ]))
}

/// `flag name = (true|false|"string");`
fn flag_statement() -> Result<Pattern> {
    Ok(Pattern::new(vec![
        Node::identifier("keyword:flag")?,
        word()?,
        Node::identifier("assign")?,
        Node::alternative(vec![
            Node::identifier("boolean:")?,
            Node::identifier("string:")?,
        ])?,
        Node::identifier("semicolon")?,
    ]))
}

/// # Summary
///
/// `Importer` builds a [`Lexer`] from a definition written in the rule
/// language.
///
/// # Methods
///
/// `new`: wrap a definition text.
/// `open`: read a definition from a file.
/// `make`: parse the definition and build the lexer.
#[derive(Debug, Clone)]
pub struct Importer {
    text: String,
}

impl Importer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut text = String::new();
        File::open(path)?.read_to_string(&mut text)?;
        Ok(Self::new(text))
    }

    pub fn make(&self) -> Result<Lexer> {
        let mut reader = definition_lexer()?;
        reader.feed(self.text.as_str());
        let tokens = match reader.tokenize(TokenizeOptions::default()) {
            Ok(reader) => reader.tokens().remove(Some(COMMENT_GROUP), None),
            Err(Error::Lex(diagnostic)) => return Err(Error::Syntax(diagnostic)),
            Err(error) => return Err(error),
        };
        self.statements(tokens)
    }

    fn statements(&self, mut tokens: TokenStream) -> Result<Lexer> {
        let token_statement = token_statement()?;
        let flag_statement = flag_statement()?;
        let mut lexer = Lexer::new();
        while !tokens.is_empty() {
            if let Some(statement) = consume(&token_statement, &mut tokens)? {
                lexer.append(self.rule(&statement)?);
            } else if let Some(statement) = consume(&flag_statement, &mut tokens)? {
                let name = statement[1].value();
                let value = &statement[3];
                let value = match value.group() {
                    "boolean" => FlagValue::Bool(value.value() == "true"),
                    _ => FlagValue::Str(value.value().to_string()),
                };
                lexer.set_flag(name, value)?;
            } else {
                let (_, token_position) = matches(&token_statement, &tokens)?;
                let (_, flag_position) = matches(&flag_statement, &tokens)?;
                return Err(self.unexpected(&tokens, token_position.max(flag_position)));
            }
        }
        debug!("imported {} rules", lexer.rules().len());
        Ok(lexer)
    }

    fn rule(&self, statement: &TokenStream) -> Result<Rule> {
        let kind = match statement[1].value() {
            "regex" => RuleKind::Regex,
            _ => RuleKind::String,
        };
        let (group, name) = if statement.len() == 8 {
            (Some(statement[2].value()), statement[4].value())
        } else {
            (None, statement[2].value())
        };
        let pattern = statement[statement.len() - 2].value();
        Rule::new(kind, pattern, name, group)
    }

    /// Report the token at `position`, or the end of the input.
    fn unexpected(&self, tokens: &TokenStream, position: usize) -> Error {
        let (message, at) = match tokens.get(position as isize) {
            Some(token) => (format!("unexpected `{}`", token.value()), token.location()),
            None => {
                let mut end = Location::default();
                end.advance(&self.text, "\n");
                (String::from("unexpected end of input"), end)
            }
        };
        Error::Syntax(Diagnostic::new(
            message,
            at,
            location::line_of(&self.text, at.line(), "\n"),
        ))
    }
}

fn flag_name(name: &str) -> String {
    name.replace('-', "_")
}

impl Lexer {
    /// Write the flags and rules of this lexer in the rule language.
    /// [`Importer`] reads the result back into an equal lexer.
    pub fn export(&self) -> String {
        let mut text = String::new();
        for name in FLAG_NAMES {
            let value = match self.flags().get(name) {
                Some(FlagValue::Bool(value)) => value.to_string(),
                Some(FlagValue::Str(value)) => quote(&value),
                None => continue,
            };
            text.push_str(&format!("flag {} = {};\n", flag_name(name), value));
        }
        for rule in self.rules() {
            let name = if rule.group() == rule.name() {
                rule.name().to_string()
            } else {
                format!("{}:{}", rule.group(), rule.name())
            };
            text.push_str(&format!(
                "token {} {} = {};\n",
                rule.kind(),
                name,
                quote(rule.pattern())
            ));
        }
        text
    }
}

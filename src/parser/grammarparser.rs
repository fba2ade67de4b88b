//! The textual notation of grammar patterns.
//!
//! ```text
//! "import"? name ";"
//! "::"? name ("::" name)*
//! "fn" name "(" (name (":" type:)? ("," | ")"))* !";"*
//! ```
//!
//! A quoted literal is a string node, `type` or `group:type` an identifier
//! node, `( ... )` a group and `( a | b )` an alternative. Nodes may be
//! prefixed with `!` and followed by one of `?`, `*` or `+`.

use super::pattern::{Node, NodeKind, Pattern, Quantifier, Selector};
use crate::error::{Diagnostic, Error, Result};
use crate::lexer::{Lexer, Rule, Token, TokenizeOptions, STRING_GROUP};
use crate::location::{self, Location};
use crate::stream::TokenStream;
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
mod tests {
    use super::*;

    fn string(literal: &str) -> Node {
        Node::string(literal).unwrap()
    }

    fn identifier(selector: &str) -> Node {
        Node::identifier(selector).unwrap()
    }

    fn group(nodes: Vec<Node>) -> Node {
        Node::group(nodes).unwrap()
    }

    fn simple_cases() -> Vec<(Pattern, &'static str)> {
        vec![
            (
                Pattern::new(vec![
                    string("import").with(Quantifier::Optional),
                    identifier("name"),
                    string(";"),
                ]),
                r#""import"? name ";""#,
            ),
            (
                Pattern::new(vec![
                    string("::").with(Quantifier::Optional),
                    identifier("name"),
                    group(vec![string("::"), identifier("name")]).with(Quantifier::Many),
                ]),
                r#""::"? name ("::" name)*"#,
            ),
        ]
    }

    fn nested_groups() -> (&'static str, Pattern) {
        (
            r#""function" type? name lparen (type? modifier* name ("=" literal)? ",")* rparen"#,
            Pattern::new(vec![
                string("function"),
                identifier("type").with(Quantifier::Optional),
                identifier("name"),
                identifier("lparen"),
                group(vec![
                    identifier("type").with(Quantifier::Optional),
                    identifier("modifier").with(Quantifier::Many),
                    identifier("name"),
                    group(vec![string("="), identifier("literal")]).with(Quantifier::Optional),
                    string(","),
                ])
                .with(Quantifier::Many),
                identifier("rparen"),
            ]),
        )
    }

    #[test]
    fn serialisation() {
        for (pattern, expected) in simple_cases() {
            assert_eq!(pattern.to_string(), expected);
        }
        let (expected, pattern) = nested_groups();
        assert_eq!(pattern.to_string(), expected);
    }

    #[test]
    fn deserialisation() {
        for (expected, notation) in simple_cases() {
            assert_eq!(notation.parse::<Pattern>().unwrap(), expected);
        }
        let (notation, expected) = nested_groups();
        assert_eq!(notation.parse::<Pattern>().unwrap(), expected);
    }

    #[test]
    fn selectors_and_adjacency() {
        let pattern: Pattern = "keyword:if int: :dec : x".parse().unwrap();
        assert_eq!(
            pattern,
            Pattern::new(vec![
                identifier("keyword:if"),
                identifier("int:"),
                identifier(":dec"),
                identifier(":"),
                identifier("x"),
            ])
        );
        // A colon only joins the words it touches.
        let pattern: Pattern = "int: dec".parse().unwrap();
        assert_eq!(pattern.nodes().len(), 2);
        let pattern: Pattern = "my-group:some-type".parse().unwrap();
        assert_eq!(pattern, Pattern::new(vec![identifier("my-group:some-type")]));
    }

    #[test]
    fn alternatives_and_negation() {
        let pattern: Pattern = r#"!(";" | "}")* ("a" b | c)+ !'x'?"#.parse().unwrap();
        assert_eq!(
            pattern,
            Pattern::new(vec![
                Node::alternative(vec![string(";"), string("}")])
                    .unwrap()
                    .with(Quantifier::Many)
                    .negated(),
                Node::alternative(vec![group(vec![string("a"), identifier("b")]), identifier("c")])
                    .unwrap()
                    .with(Quantifier::AtLeastOne),
                string("x").negated().with(Quantifier::Optional),
            ])
        );
        assert_eq!(pattern.to_string(), r#"!(";" | "}")* ("a" b | c)+ !"x"?"#);
    }

    #[test]
    fn display_round_trip() {
        for notation in [
            r#""a\"b" "\\" "tab\t""#,
            r#"((a | b) | (c d) e)"#,
            r#"(x) !(y z)+"#,
            "",
        ] {
            let pattern: Pattern = notation.parse().unwrap();
            let again: Pattern = pattern.to_string().parse().unwrap();
            assert_eq!(again, pattern);
        }
    }

    #[test]
    fn syntax_errors() {
        for (notation, message) in [
            ("(a b", "expected `)` at line 1, character 5\n(a b\n----^"),
            ("a )", "unexpected `)` at line 1, character 3\na )\n--^"),
            ("()", "empty group at line 1, character 1\n()\n^"),
            ("(a | )", "empty alternative branch at line 1, character 6\n(a | )\n-----^"),
            ("a ??", "unexpected `?` at line 1, character 4\na ??\n---^"),
            ("!", "expected a pattern node at line 1, character 2\n!\n-^"),
            ("a & b", "unrecognised input at line 1, character 3\na & b\n--^"),
            ("\"\"", "empty string literal at line 1, character 1\n\"\"\n^"),
        ] {
            match notation.parse::<Pattern>() {
                Err(Error::Syntax(diagnostic)) => assert_eq!(diagnostic.to_string(), message),
                other => panic!("{:?} gave {:?}", notation, other),
            }
        }
    }
}

const WORD: &str = "word";

fn notation_lexer() -> Result<Lexer> {
    let mut lexer = Lexer::new();
    lexer.append(Rule::regex(
        "[A-Za-z_][A-Za-z0-9_]*(-[A-Za-z0-9_]+)*",
        WORD,
        None,
    )?);
    for (symbol, name) in [
        (":", "colon"),
        ("(", "lparen"),
        (")", "rparen"),
        ("|", "bar"),
        ("!", "not"),
    ] {
        lexer.append(Rule::string(symbol, name, Some("punctuation"))?);
    }
    for symbol in ["?", "*", "+"] {
        lexer.append(Rule::string(symbol, symbol, Some("quantifier"))?);
    }
    Ok(lexer)
}

/// Recursive-descent reader of the pattern notation.
struct NotationParser<'a> {
    text: &'a str,
    tokens: TokenStream,
}

impl<'a> NotationParser<'a> {
    fn new(text: &'a str) -> Result<Self> {
        let mut lexer = notation_lexer()?;
        lexer.feed(text);
        let tokens = match lexer.tokenize(TokenizeOptions::default()) {
            Ok(lexer) => lexer.tokens().clone(),
            Err(Error::Lex(diagnostic)) => return Err(Error::Syntax(diagnostic)),
            Err(error) => return Err(error),
        };
        Ok(Self { text, tokens })
    }

    fn error_at(&self, message: impl Into<String>, at: Location) -> Error {
        Error::Syntax(Diagnostic::new(
            message,
            at,
            location::line_of(self.text, at.line(), "\n"),
        ))
    }

    /// Report an error at the next token, or at the end of the text.
    fn error(&self, message: impl Into<String>) -> Error {
        let location = match self.tokens.first() {
            Some(token) => token.location(),
            None => {
                let mut end = Location::default();
                end.advance(self.text, "\n");
                end
            }
        };
        self.error_at(message, location)
    }

    fn unexpected(&self) -> Error {
        match self.tokens.first() {
            Some(token) => self.error(format!("unexpected `{}`", token.value())),
            None => self.error("unexpected end of pattern"),
        }
    }

    fn peek_is(&self, token_type: &str) -> bool {
        self.tokens
            .first()
            .map_or(false, |token| token.group() != STRING_GROUP && token.token_type() == token_type)
    }

    fn bump(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    fn eat(&mut self, token_type: &str) -> Option<Token> {
        if self.peek_is(token_type) {
            self.bump()
        } else {
            None
        }
    }

    /// Take the next token if it is of type `token_type` and starts right
    /// where `previous` ends.
    fn eat_adjacent(&mut self, token_type: &str, previous: &Token) -> Option<Token> {
        let adjacent = self.tokens.first().map_or(false, |token| {
            token.line() == previous.line()
                && token.char() == previous.char() + previous.value().chars().count()
        });
        if adjacent {
            self.eat(token_type)
        } else {
            None
        }
    }

    fn parse(mut self) -> Result<Pattern> {
        let nodes = self.sequence()?;
        if self.tokens.is_empty() {
            Ok(Pattern::new(nodes))
        } else {
            Err(self.unexpected())
        }
    }

    /// Read nodes up to a `|`, a `)` or the end of the text.
    fn sequence(&mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        while !self.tokens.is_empty() && !self.peek_is("bar") && !self.peek_is("rparen") {
            nodes.push(self.node()?);
        }
        Ok(nodes)
    }

    fn node(&mut self) -> Result<Node> {
        let not = self.eat("not").is_some();
        let mut node = self.atom()?;
        if not {
            node = node.negated();
        }
        for quantifier in [Quantifier::Optional, Quantifier::Many, Quantifier::AtLeastOne] {
            if self.eat(quantifier.symbol()).is_some() {
                return Ok(node.with(quantifier));
            }
        }
        Ok(node)
    }

    fn atom(&mut self) -> Result<Node> {
        let Some(token) = self.tokens.first().cloned() else {
            return Err(self.error("expected a pattern node"));
        };
        if token.group() == STRING_GROUP {
            self.bump();
            return Node::string(token.value())
                .map_err(|_| self.error_at("empty string literal", token.location()));
        }
        match token.token_type() {
            WORD | "colon" => self.selector(),
            "lparen" => self.parenthesised(),
            _ => Err(self.unexpected()),
        }
    }

    /// `type`, `group:type`, `group:`, `:type` or `:`.
    fn selector(&mut self) -> Result<Node> {
        let mut group = None;
        let mut token_type = None;
        let mut last = match self.eat(WORD) {
            Some(word) => {
                token_type = Some(word.clone());
                word
            }
            None => self.bump().ok_or_else(|| self.unexpected())?,
        };
        let colon = if last.token_type() == "colon" {
            Some(last.clone())
        } else {
            self.eat_adjacent("colon", &last)
        };
        if let Some(colon) = colon {
            group = token_type.take();
            last = colon;
            token_type = self.eat_adjacent(WORD, &last);
        }
        Node::new(NodeKind::Identifier(Selector::new(
            group.as_ref().map(Token::value),
            token_type.as_ref().map(Token::value),
        )))
    }

    fn parenthesised(&mut self) -> Result<Node> {
        let Some(open) = self.eat("lparen") else {
            return Err(self.unexpected());
        };
        let mut branches = vec![self.sequence()?];
        while self.eat("bar").is_some() {
            branches.push(self.sequence()?);
        }
        let Some(close) = self.eat("rparen") else {
            return Err(self.error("expected `)`"));
        };
        if branches.len() == 1 {
            let nodes = branches.pop().unwrap_or_default();
            if nodes.is_empty() {
                return Err(self.error_at("empty group", open.location()));
            }
            return Node::group(nodes);
        }
        let mut alternative = Vec::with_capacity(branches.len());
        for mut nodes in branches {
            match nodes.len() {
                0 => return Err(self.error_at("empty alternative branch", close.location())),
                1 => alternative.extend(nodes.pop()),
                _ => alternative.push(Node::group(nodes)?),
            }
        }
        Node::alternative(alternative)
    }
}

impl FromStr for Pattern {
    type Err = Error;

    /// Read a pattern written in the notation of this module.
    fn from_str(notation: &str) -> Result<Self> {
        NotationParser::new(notation)?.parse()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated() {
            f.write_str("!")?;
        }
        match self.kind() {
            NodeKind::String(literal) => f.write_str(&crate::lexer::quote(literal))?,
            NodeKind::Identifier(selector) => write!(f, "{}", selector)?,
            NodeKind::Group(nodes) => write!(f, "({})", nodes.iter().join(" "))?,
            NodeKind::Alternative(branches) => {
                let branches = branches.iter().map(|branch| match branch.kind() {
                    // A plain group of several nodes is written as a bare branch.
                    NodeKind::Group(nodes)
                        if nodes.len() > 1
                            && !branch.is_negated()
                            && branch.quantifier() == Quantifier::One =>
                    {
                        nodes.iter().join(" ")
                    }
                    _ => branch.to_string(),
                });
                write!(f, "({})", branches.format(" | "))?
            }
        }
        f.write_str(self.quantifier().symbol())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nodes().iter().format(" "))
    }
}

use super::strings::{self, Scan};
use super::{ErrorPolicy, FlagValue, Flags, Rule, Token, TokenizeOptions};
use crate::error::{Diagnostic, Error, Result};
use crate::stream::{StringStream, TokenStream};
use log::{debug, trace, warn};
use std::rc::Rc;


/// Group of the tokens produced for unrecognised input.
pub const INVALID_GROUP: &str = "tartak";
/// Type of the tokens produced for unrecognised input.
pub const INVALID_TYPE: &str = "invalid";
/// Group of the whitespace tokens of the raw stream.
pub const WHITESPACE_GROUP: &str = "whitespace";
/// Group of quoted string tokens.
pub const STRING_GROUP: &str = "string";

/// # Summary
///
/// A builder for a [`Lexer`] object.
///
/// # Attribute specificators
///
/// `with_rule`: add a rule at the end of the rule list.
/// `with_flag`: set a flag by name. May fail if the flag is unknown.
/// `with_flags`: replace all the flags at once.
#[derive(Debug, Default)]
pub struct LexerBuilder {
    rules: Vec<Rule>,
    flags: Flags,
}

impl LexerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_flag(mut self, name: &str, value: impl Into<FlagValue>) -> Result<Self> {
        self.flags.set(name, value.into())?;
        Ok(self)
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn build(self) -> Lexer {
        Lexer {
            rules: self.rules,
            flags: self.flags,
            ..Lexer::default()
        }
    }
}

/// # Summary
///
/// `Lexer` is the main object that is used for lexing.
/// It owns an ordered list of [`Rule`]s and a set of [`Flags`], is fed a
/// string, and turns it into two [`TokenStream`]s: the significant tokens,
/// and the raw tokens, which also contain whitespace.
///
/// Rules and flags persist across calls to [`Lexer::feed`], so a configured
/// lexer can be reused on several inputs.
///
/// Two lexers are equal when their rules and flags are.
///
/// # Methods
///
/// `feed`: install the input string.
/// `append`: add a rule.
/// `set_flag`: set a flag by name.
/// `tokenize`: produce the tokens of the input.
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    rules: Vec<Rule>,
    flags: Flags,
    input: Rc<str>,
    tokens: TokenStream,
    raw: TokenStream,
}

impl PartialEq for Lexer {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules && self.flags == other.flags
    }
}

impl Lexer {
    /// Create a new `Lexer` object, without rules and with the default flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the input string. Rules and flags are kept.
    pub fn feed(&mut self, input: impl Into<Rc<str>>) -> &mut Self {
        self.input = input.into();
        self
    }

    /// Add a rule at the end of the rule list.
    pub fn append(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn set_flag(&mut self, name: &str, value: impl Into<FlagValue>) -> Result<&mut Self> {
        self.flags.set(name, value.into())?;
        Ok(self)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The significant tokens produced by the last tokenization.
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// The raw tokens produced by the last tokenization, whitespace included.
    pub fn raw_tokens(&self) -> &TokenStream {
        &self.raw
    }

    pub(crate) fn set_streams(&mut self, tokens: TokenStream, raw: TokenStream) {
        self.tokens = tokens;
        self.raw = raw;
    }

    /// Consume the input, producing the significant and raw token streams.
    ///
    /// Under [`ErrorPolicy::Throw`], input that cannot be recognised aborts
    /// tokenization; no token is kept. The other policies always complete.
    pub fn tokenize(&mut self, options: TokenizeOptions) -> Result<&mut Self> {
        debug!(
            "tokenizing {} bytes with {} rules (indent: {}, errors: {})",
            self.input.len(),
            self.rules.len(),
            options.indent,
            options.errors
        );
        self.tokens = TokenStream::new();
        self.raw = TokenStream::new();
        let mut stream = StringStream::new(self.input.clone(), self.flags.newline.as_str());
        let mut tokens = TokenStream::new();
        let mut raw = TokenStream::new();
        // No significant token has been produced on the current line yet.
        let mut line_start = true;
        while !stream.is_empty() {
            self.whitespace(&mut stream, &mut tokens, &mut raw, options.indent, &mut line_start);
            if stream.is_empty() {
                break;
            }
            let location = stream.location();
            let scanned = strings::scan(stream.peek(), &self.flags);
            let (lexeme, token, raw_value) = match scanned {
                Scan::Found { lexeme, quote } => (
                    lexeme,
                    Token::new(
                        location,
                        strings::decode(lexeme, quote),
                        quote.token_type(),
                        STRING_GROUP,
                    ),
                    Some(lexeme),
                ),
                Scan::Unterminated(_) if options.errors == ErrorPolicy::Throw => {
                    return Err(Error::Lex(Diagnostic::new(
                        "unterminated string",
                        location,
                        stream.current_line(),
                    )));
                }
                Scan::Unterminated(_) | Scan::None => match self.apply_rules(stream.peek()) {
                    Some((lexeme, rule)) => (
                        lexeme,
                        Token::new(location, lexeme, rule.name(), rule.group()),
                        None,
                    ),
                    None => {
                        let run = self.invalid_run(stream.peek());
                        match options.errors {
                            ErrorPolicy::Throw => {
                                return Err(Error::Lex(Diagnostic::new(
                                    "unrecognised input",
                                    location,
                                    stream.current_line(),
                                )));
                            }
                            ErrorPolicy::Save => {
                                warn!("saving unrecognised input {:?} at {}", run, location);
                                (
                                    run,
                                    Token::new(location, run, INVALID_TYPE, INVALID_GROUP),
                                    None,
                                )
                            }
                            ErrorPolicy::Drop => {
                                warn!("dropping unrecognised input {:?} at {}", run, location);
                                let run = run.to_string();
                                stream.shift(&run);
                                line_start = false;
                                continue;
                            }
                        }
                    }
                },
            };
            trace!("{:?}", token);
            let raw_token = match raw_value {
                Some(value) => Token::new(location, value, token.token_type(), token.group()),
                None => token.clone(),
            };
            let lexeme = lexeme.to_string();
            tokens.append(token);
            raw.append(raw_token);
            stream.shift(&lexeme);
            line_start = false;
        }
        debug!(
            "produced {} significant and {} raw tokens",
            tokens.len(),
            raw.len()
        );
        self.tokens = tokens;
        self.raw = raw;
        Ok(self)
    }

    /// Consume a maximal run of whitespace. Every token goes to the raw
    /// stream; with `indent`, line-leading runs followed by content also go
    /// to the significant stream.
    fn whitespace(
        &self,
        stream: &mut StringStream,
        tokens: &mut TokenStream,
        raw: &mut TokenStream,
        indent: bool,
        line_start: &mut bool,
    ) {
        let newline = self.flags.newline.as_str();
        while let Some((lexeme, kind)) = whitespace_run(stream.peek(), newline) {
            let token = Token::new(stream.location(), lexeme, kind, WHITESPACE_GROUP);
            if kind == "newline" {
                *line_start = true;
            } else if indent && *line_start {
                let after = stream.peek()[lexeme.len()..].trim_start_matches([' ', '\t']);
                if !after.is_empty() && !after.starts_with(newline) {
                    trace!("indentation {:?}", token);
                    tokens.append(token.clone());
                }
            }
            raw.append(token);
            let lexeme = lexeme.to_string();
            stream.shift(&lexeme);
        }
    }

    /// Return the lexeme recognised by the first matching rule.
    fn apply_rules<'a>(&self, input: &'a str) -> Option<(&'a str, &Rule)> {
        self.rules
            .iter()
            .find_map(|rule| rule.find(input).map(|lexeme| (lexeme, rule)))
    }

    /// Whether something (whitespace, a string or a rule) recognises the
    /// start of `input`.
    fn recognises(&self, input: &str) -> bool {
        whitespace_run(input, &self.flags.newline).is_some()
            || matches!(strings::scan(input, &self.flags), Scan::Found { .. })
            || self.apply_rules(input).is_some()
    }

    /// Return the maximal non-empty prefix of `input` in which no position is
    /// recognised, the first one excepted.
    fn invalid_run<'a>(&self, input: &'a str) -> &'a str {
        let mut chars = input.char_indices().skip(1);
        let end = loop {
            match chars.next() {
                Some((index, _)) if self.recognises(&input[index..]) => break index,
                Some(_) => {}
                None => break input.len(),
            }
        };
        &input[..end]
    }
}

/// Return the whitespace run at the start of `input`, and its type: one
/// newline sequence, or a run of spaces, or a run of tabs.
fn whitespace_run<'a>(input: &'a str, newline: &str) -> Option<(&'a str, &'static str)> {
    if !newline.is_empty() && input.starts_with(newline) {
        return Some((&input[..newline.len()], "newline"));
    }
    let (chr, kind) = match input.chars().next()? {
        ' ' => (' ', "space"),
        '\t' => ('\t', "tab"),
        _ => return None,
    };
    let mut end = input.len() - input.trim_start_matches(chr).len();
    // A newline sequence starting with the same character ends the run.
    if !newline.is_empty() {
        if let Some(index) = input[..end].find(newline) {
            end = index;
        }
    }
    (end > 0).then(|| (&input[..end], kind))
}

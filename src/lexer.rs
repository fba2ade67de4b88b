//! # Lexer
//!
//! This module contains structs and primitives related to tokenization, or lexing. The most useful are:
//!  - the [`Lexer`], which is the base type for lexing. It owns an ordered list of [`Rule`]s and
//!    a set of [`Flags`], and turns a string into a significant and a raw [`TokenStream`];
//!  - [`LexerBuilder`] is, as the name explains, the builder struct for [`Lexer`];
//!  - [`Token`] is the basic interface to deal with the result of the tokenization;
//!  - [`Importer`] reads lexer definitions written in the rule language, and
//!    [`Lexer::export`] writes them back;
//!  - [`LexerState`] is the serialisable snapshot of a lexer and its output.
//!
//!  [`TokenStream`]: crate::stream::TokenStream

mod dump;
mod flags;
mod grammarparser;
#[allow(clippy::module_inception)]
mod lexer;
mod rule;
mod strings;
mod token;

pub use dump::LexerState;
pub use flags::{ErrorPolicy, FlagValue, Flags, TokenizeOptions, FLAG_NAMES};
pub use grammarparser::Importer;
pub use lexer::{Lexer, LexerBuilder, INVALID_GROUP, INVALID_TYPE, STRING_GROUP, WHITESPACE_GROUP};
pub use rule::{Rule, RuleDefinition, RuleKind};
pub(crate) use strings::quote;
pub use token::Token;

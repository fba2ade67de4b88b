//! # Parser
//!
//! Grammar patterns and the token-stream pattern matcher.
//!  - [`Pattern`] is an ordered list of [`Node`]s, each a string literal, a token selector, a
//!    group or an alternative, with a [`Quantifier`] and an optional negation. Patterns are read
//!    from and written to a compact notation, or loaded from JSON;
//!  - [`matches`] reports whether a pattern matches the start of a
//!    [`TokenStream`](crate::stream::TokenStream), and how many tokens it consumed;
//!  - [`consume`] does the same, and removes the matched tokens from the stream.

mod grammarparser;
mod matcher;
mod pattern;

pub use matcher::{consume, matches};
pub use pattern::{Node, NodeKind, Pattern, Quantifier, Selector};

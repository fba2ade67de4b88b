//! # Tartak
//!
//! A toolkit for language front-ends. A [`Lexer`](lexer::Lexer) turns text into a stream of
//! classified tokens following an ordered list of rules, and the [`parser`] matches grammar
//! patterns against such streams.
//!
//! ```
//! use tartak::lexer::{Lexer, Rule, TokenizeOptions};
//! use tartak::parser::{matches, Pattern};
//!
//! # fn main() -> tartak::error::Result<()> {
//! let mut lexer = Lexer::new();
//! lexer
//!     .append(Rule::string("import", "import", Some("keyword"))?)
//!     .append(Rule::regex("[a-z]+", "name", None)?)
//!     .append(Rule::string(";", "semicolon", None)?)
//!     .feed("import os;");
//! lexer.tokenize(TokenizeOptions::default())?;
//! let pattern: Pattern = r#""import"? name ";""#.parse()?;
//! assert_eq!(matches(&pattern, lexer.tokens())?, (true, 3));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod lexer;
pub mod location;
pub mod parser;
pub mod printer;
pub mod stream;
#[cfg(test)]
mod test_utilities;

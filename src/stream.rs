use crate::lexer::Token;
use crate::location::Location;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Index;
use std::rc::Rc;


/// # Summary
///
/// A cursor over a string, which keeps track of the line and character it
/// has reached. The line terminator is configurable.
///
/// # Methods
/// `new`: build a `StringStream`.
/// `peek`: borrows (read-only) the rest of the stream as a string slice.
/// `shift`: consume a lexeme, updating the location.
/// `is_empty`: whether the stream is exhausted.
#[derive(Debug, Clone)]
pub struct StringStream {
    stream: Rc<str>,
    newline: Rc<str>,
    bytes_pos: usize,
    location: Location,
}

impl StringStream {
    /// Build a new `StringStream` over `string`, where lines end with `newline`.
    pub fn new(string: impl Into<Rc<str>>, newline: impl Into<Rc<str>>) -> Self {
        Self {
            stream: string.into(),
            newline: newline.into(),
            bytes_pos: 0,
            location: Location::default(),
        }
    }

    /// Return a string slice corresponding to the
    /// underlying string, starting at the position of the stream.
    pub fn peek(&self) -> &str {
        &self.stream[self.bytes_pos..]
    }

    /// Consume `lexeme`, which must be a prefix of the rest of the stream.
    pub fn shift(&mut self, lexeme: &str) {
        debug_assert!(self.peek().starts_with(lexeme));
        self.location.advance(lexeme, &self.newline);
        self.bytes_pos += lexeme.len();
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_pos == self.stream.len()
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Return the full text of the line the stream is currently on.
    pub fn current_line(&self) -> &str {
        crate::location::line_of(&self.stream, self.location.line(), &self.newline)
    }
}

/// # Summary
///
/// An ordered, checkpointable view over a sequence of [`Token`]s.
///
/// The stream holds a cursor and a stack of previous cursor positions
/// (checkpoints). Length, indexing, iteration and equality only see the
/// tokens from the cursor to the end.
///
/// # Methods
///
/// `point`: move the cursor, recording the previous position.
/// `rewind`: restore a recorded position.
/// `get`: cursor-relative lookup (negative indices count from the physical end).
/// `slice`: a new stream with the first `n` visible tokens.
/// `remove`: a new stream without the tokens of a given group and/or type.
/// `copy`: an independent snapshot of the visible tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
    checkpoints: Vec<usize>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens from the cursor to the end.
    pub fn len(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn checkpoints(&self) -> &[usize] {
        &self.checkpoints
    }

    /// Move the cursor by `offset` (if `relative`) or to `offset`, recording
    /// the previous cursor as a checkpoint. The cursor is kept within the
    /// stream.
    pub fn point(&mut self, offset: isize, relative: bool) -> &mut Self {
        self.checkpoints.push(self.cursor);
        let target = if relative {
            self.cursor as isize + offset
        } else {
            offset
        };
        self.cursor = target.clamp(0, self.tokens.len() as isize) as usize;
        self
    }

    /// Restore the cursor recorded at checkpoint `n`, forgetting that
    /// checkpoint and every later one. A negative `n` counts back from the
    /// most recent checkpoint; going back further than the first checkpoint
    /// restores the initial state.
    pub fn rewind(&mut self, n: isize) -> &mut Self {
        let index = if n < 0 {
            (self.checkpoints.len() as isize + n).max(0) as usize
        } else {
            n as usize
        };
        match self.checkpoints.get(index) {
            Some(&cursor) => {
                self.cursor = cursor.min(self.tokens.len());
                self.checkpoints.truncate(index);
            }
            None if n < 0 => {
                self.cursor = 0;
                self.checkpoints.clear();
            }
            None => {}
        }
        self
    }

    /// Undo the last call to [`TokenStream::point`].
    pub fn rewind_last(&mut self) -> &mut Self {
        self.rewind(-1)
    }

    /// Cursor-relative lookup. Negative indices index from the physical end
    /// of the stream, regardless of the cursor.
    pub fn get(&self, index: isize) -> Option<&Token> {
        if index >= 0 {
            self.tokens.get(self.cursor + index as usize)
        } else {
            self.tokens
                .len()
                .checked_sub(index.unsigned_abs())
                .and_then(|index| self.tokens.get(index))
        }
    }

    pub fn first(&self) -> Option<&Token> {
        self.get(0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens[self.cursor..].iter()
    }

    /// Return a new stream made of the first `n` visible tokens.
    pub fn slice(&self, n: usize) -> TokenStream {
        self.iter().take(n).cloned().collect()
    }

    /// Return a new stream made of the visible tokens that neither belong to
    /// `group` nor have type `token_type`. With both `None`, nothing is removed.
    pub fn remove(&self, group: Option<&str>, token_type: Option<&str>) -> TokenStream {
        self.iter()
            .filter(|token| {
                group.map_or(true, |group| token.group() != group)
                    && token_type.map_or(true, |token_type| token.token_type() != token_type)
            })
            .cloned()
            .collect()
    }

    /// Return an independent snapshot of the visible tokens.
    pub fn copy(&self) -> TokenStream {
        self.iter().cloned().collect()
    }

    pub fn append(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Remove and return the token under the cursor.
    pub fn pop(&mut self) -> Option<Token> {
        if self.is_empty() {
            None
        } else {
            Some(self.tokens.remove(self.cursor))
        }
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[self.cursor + index]
    }
}

impl PartialEq for TokenStream {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
            cursor: 0,
            checkpoints: Vec::new(),
        }
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        tokens.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for TokenStream {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for TokenStream {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Token>::deserialize(deserializer).map(TokenStream::from)
    }
}

//! Quoted string scanning and decoding.

use super::Flags;


/// The quoting styles, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quote {
    TripleDouble,
    TripleSingle,
    Double,
    Single,
}

impl Quote {
    const PRIORITY: [Quote; 4] = [
        Quote::TripleDouble,
        Quote::TripleSingle,
        Quote::Double,
        Quote::Single,
    ];

    pub(crate) fn delimiter(self) -> &'static str {
        match self {
            Self::TripleDouble => "\"\"\"",
            Self::TripleSingle => "'''",
            Self::Double => "\"",
            Self::Single => "'",
        }
    }

    /// The type given to tokens of this style.
    pub(crate) fn token_type(self) -> &'static str {
        match self {
            Self::TripleDouble | Self::TripleSingle => "triple",
            Self::Double => "double",
            Self::Single => "single",
        }
    }

    fn is_triple(self) -> bool {
        matches!(self, Self::TripleDouble | Self::TripleSingle)
    }

    fn enabled(self, flags: &Flags) -> bool {
        match self {
            Self::TripleDouble => flags.string_dbl_triple,
            Self::TripleSingle => flags.string_sgl_triple,
            Self::Double => flags.string_double,
            Self::Single => flags.string_single,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Scan<'a> {
    /// A complete quoted string, delimiters included.
    Found { lexeme: &'a str, quote: Quote },
    /// A string was opened but never closed.
    Unterminated(Quote),
    None,
}

/// Scan a quoted string at the start of `input`, trying the enabled styles
/// in priority order.
pub(crate) fn scan<'a>(input: &'a str, flags: &Flags) -> Scan<'a> {
    let Some(quote) = Quote::PRIORITY
        .into_iter()
        .find(|quote| quote.enabled(flags) && input.starts_with(quote.delimiter()))
    else {
        return Scan::None;
    };
    let delimiter = quote.delimiter();
    let newline = flags.newline.as_str();
    let mut rest = &input[delimiter.len()..];
    let mut escaped = false;
    loop {
        if !escaped && rest.starts_with(delimiter) {
            let end = input.len() - rest.len() + delimiter.len();
            return Scan::Found {
                lexeme: &input[..end],
                quote,
            };
        }
        if !quote.is_triple() && !newline.is_empty() && rest.starts_with(newline) {
            return Scan::Unterminated(quote);
        }
        let mut chars = rest.chars();
        let Some(chr) = chars.next() else {
            return Scan::Unterminated(quote);
        };
        escaped = chr == '\\' && !escaped;
        rest = chars.as_str();
    }
}

/// Strip the delimiters of a scanned string and resolve its escapes.
pub(crate) fn decode(lexeme: &str, quote: Quote) -> String {
    let delimiter = quote.delimiter();
    let body = &lexeme[delimiter.len()..lexeme.len() - delimiter.len()];
    let quote_char = delimiter.chars().next();
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(chr) = chars.next() {
        if chr != '\\' {
            value.push(chr);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('\\') => value.push('\\'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some(other) if Some(other) == quote_char => value.push(other),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

/// Write `value` as a double-quoted string that [`decode`] reads back.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for chr in value.chars() {
        match chr {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            chr => quoted.push(chr),
        }
    }
    quoted.push('"');
    quoted
}

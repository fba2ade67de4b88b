use super::pattern::{Node, NodeKind, Quantifier};
use crate::error::{Error, Result};
use crate::stream::TokenStream;
use log::{debug, trace};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Token;
    use crate::location::Location;
    use crate::parser::Pattern;

    fn stream(values: &[&str]) -> TokenStream {
        values
            .iter()
            .map(|value| {
                let (group, token_type) = match *value {
                    "(" | ")" | ";" | "," | "=" | "::" => ("punctuation", *value),
                    value if value.chars().all(|chr| chr.is_ascii_digit()) => ("int", "dec"),
                    _ => ("name", "name"),
                };
                Token::new(Location::default(), *value, token_type, group)
            })
            .collect()
    }

    fn parse(notation: &str) -> Pattern {
        notation.parse().unwrap()
    }

    #[test]
    fn zero_or_more() {
        let pattern = Pattern::new(vec![Node::string("foo").unwrap().with(Quantifier::Many)]);
        assert_eq!(matches(&pattern, &stream(&[])).unwrap(), (true, 0));
        assert_eq!(matches(&pattern, &stream(&["foo"])).unwrap(), (true, 1));
        assert_eq!(
            matches(&pattern, &stream(&["foo", "foo", "foo"])).unwrap(),
            (true, 3)
        );
        assert_eq!(
            matches(&pattern, &stream(&["foo", "bar", "foo"])).unwrap(),
            (true, 1)
        );
    }

    #[test]
    fn one_or_more() {
        let pattern = Pattern::new(vec![Node::string("foo")
            .unwrap()
            .with(Quantifier::AtLeastOne)]);
        assert!(matches!(
            matches(&pattern, &stream(&[])),
            Err(Error::EndOfTokenStream)
        ));
        assert_eq!(matches(&pattern, &stream(&["bar"])).unwrap(), (false, 0));
        assert_eq!(
            matches(&pattern, &stream(&["foo", "foo", "bar"])).unwrap(),
            (true, 2)
        );
    }

    #[test]
    fn exactly_one_and_optional() {
        let one = parse(r#""foo""#);
        assert_eq!(matches(&one, &stream(&["foo"])).unwrap(), (true, 1));
        assert_eq!(matches(&one, &stream(&[])).unwrap(), (false, 0));
        let optional = parse(r#""foo"?"#);
        assert_eq!(matches(&optional, &stream(&["foo"])).unwrap(), (true, 1));
        assert_eq!(matches(&optional, &stream(&[])).unwrap(), (true, 0));
        assert_eq!(matches(&optional, &stream(&["bar"])).unwrap(), (true, 0));
    }

    #[test]
    fn sequences_report_the_failing_position() {
        let pattern = parse(r#""import"? name ";""#);
        assert_eq!(
            matches(&pattern, &stream(&["import", "os", ";"])).unwrap(),
            (true, 3)
        );
        assert_eq!(matches(&pattern, &stream(&["os", ";", "x"])).unwrap(), (true, 2));
        assert_eq!(
            matches(&pattern, &stream(&["import", "os", "os"])).unwrap(),
            (false, 2)
        );
        assert_eq!(matches(&pattern, &stream(&["import", "42"])).unwrap(), (false, 1));
    }

    #[test]
    fn groups() {
        let pattern = parse(r#""::"? name ("::" name)*"#);
        assert_eq!(
            matches(&pattern, &stream(&["::", "std", "::", "io", "::", "Read"])).unwrap(),
            (true, 6)
        );
        // A half-matched group occurrence is given back.
        assert_eq!(
            matches(&pattern, &stream(&["std", "::", "io", "::", "42"])).unwrap(),
            (true, 3)
        );
    }

    #[test]
    fn nested_groups() {
        let pattern = parse(r#""fn" name "(" (name ("=" int:)? ",")* ")""#);
        let tokens = stream(&["fn", "f", "(", "a", ",", "b", "=", "1", ",", ")"]);
        assert_eq!(matches(&pattern, &tokens).unwrap(), (true, 10));
        let tokens = stream(&["fn", "f", "(", "a", ",", "b", "=", "c", ",", ")"]);
        assert_eq!(matches(&pattern, &tokens).unwrap(), (false, 5));
    }

    #[test]
    fn alternatives_take_the_first_match() {
        let pattern = parse(r#"(int: | name | name "=")"#);
        assert_eq!(matches(&pattern, &stream(&["42"])).unwrap(), (true, 1));
        assert_eq!(matches(&pattern, &stream(&["x", "="])).unwrap(), (true, 1));
        assert_eq!(matches(&pattern, &stream(&[";"])).unwrap(), (false, 0));

        let pattern = parse(r#"("a" "b" "c" | "a" "x")"#);
        assert_eq!(
            matches(&pattern, &stream(&["a", "b", "d"])).unwrap(),
            (false, 2)
        );
    }

    #[test]
    fn negation() {
        let pattern = parse(r#"!";"* ";""#);
        assert_eq!(
            matches(&pattern, &stream(&["a", "=", "1", ";"])).unwrap(),
            (true, 4)
        );
        assert_eq!(matches(&pattern, &stream(&[";"])).unwrap(), (true, 1));
        assert_eq!(matches(&pattern, &stream(&["a", "b"])).unwrap(), (false, 2));

        let pattern = parse("!int:");
        assert_eq!(matches(&pattern, &stream(&["x"])).unwrap(), (true, 1));
        assert_eq!(matches(&pattern, &stream(&["1"])).unwrap(), (false, 0));
        assert_eq!(matches(&pattern, &stream(&[])).unwrap(), (false, 0));
    }

    #[test]
    fn no_backtracking() {
        // The greedy `name*` eats the name the second node needs.
        let pattern = parse("name* name");
        assert_eq!(matches(&pattern, &stream(&["a", "b"])).unwrap(), (false, 2));
    }

    #[test]
    fn matching_is_cursor_relative_and_pure() {
        let mut tokens = stream(&["skip", "foo", "foo"]);
        tokens.point(1, true);
        let pattern = parse(r#""foo"+"#);
        assert_eq!(matches(&pattern, &tokens).unwrap(), (true, 2));
        assert_eq!(tokens.cursor(), 1);
        assert_eq!(tokens.checkpoints(), &[0]);
    }

    #[test]
    fn consuming() {
        let mut tokens = stream(&["x", "=", "1", ";", "y"]);
        let pattern = parse(r#"name "=" int: ";""#);
        let statement = consume(&pattern, &mut tokens).unwrap().unwrap();
        assert_eq!(statement, stream(&["x", "=", "1", ";"]));
        assert_eq!(tokens, stream(&["y"]));
        assert_eq!(consume(&pattern, &mut tokens).unwrap(), None);
        assert_eq!(tokens, stream(&["y"]));
    }
}

/// The outcome of matching part of a pattern at some position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Matched, consuming this many tokens.
    Matched(usize),
    /// Failed at this position, relative to where matching started.
    Failed(usize),
}

/// # Summary
///
/// Match `pattern` against the visible tokens of `tokens`, and return
/// whether it matched and the number of tokens it consumed (on success) or
/// the position of the token where it failed (otherwise).
///
/// Matching is greedy and never backtracks: once a repeated node has
/// consumed what it can, no token is given back to a later node.
///
/// # Errors
///
/// [`Error::EndOfTokenStream`] if a `+` node is reached with no token left.
pub fn matches(pattern: impl AsRef<[Node]>, tokens: &TokenStream) -> Result<(bool, usize)> {
    let nodes = pattern.as_ref();
    debug!(
        "matching {} pattern nodes against {} tokens",
        nodes.len(),
        tokens.len()
    );
    let mut stream = tokens.copy();
    let result = match sequence(nodes, &mut stream)? {
        Outcome::Matched(count) => (true, count),
        Outcome::Failed(position) => (false, position),
    };
    debug!("match result: {:?}", result);
    Ok(result)
}

/// # Summary
///
/// Match `pattern` at the cursor of `tokens` and, if it matched, remove the
/// matched tokens from `tokens` and return them as a new stream.
///
/// On mismatch `tokens` is left untouched and `None` is returned.
pub fn consume(pattern: impl AsRef<[Node]>, tokens: &mut TokenStream) -> Result<Option<TokenStream>> {
    let (matched, count) = matches(pattern, tokens)?;
    if !matched {
        return Ok(None);
    }
    Ok(Some((0..count).filter_map(|_| tokens.pop()).collect()))
}

/// Run `body` from the current cursor, then restore the cursor.
fn lookahead<T>(stream: &mut TokenStream, body: impl FnOnce(&mut TokenStream) -> T) -> T {
    let depth = stream.checkpoints().len() as isize;
    let result = body(stream);
    stream.rewind(depth);
    result
}

fn sequence(nodes: &[Node], stream: &mut TokenStream) -> Result<Outcome> {
    lookahead(stream, |stream| {
        let mut consumed = 0;
        for node in nodes {
            match quantified(node, stream)? {
                Outcome::Matched(count) => {
                    stream.point(count as isize, true);
                    consumed += count;
                }
                Outcome::Failed(position) => return Ok(Outcome::Failed(consumed + position)),
            }
        }
        Ok(Outcome::Matched(consumed))
    })
}

/// Match `node` with its quantifier applied.
fn quantified(node: &Node, stream: &mut TokenStream) -> Result<Outcome> {
    match node.quantifier() {
        Quantifier::One => occurrence(node, stream),
        Quantifier::Optional => Ok(match occurrence(node, stream)? {
            Outcome::Failed(_) => Outcome::Matched(0),
            matched => matched,
        }),
        Quantifier::Many => repeat(node, stream, 0),
        Quantifier::AtLeastOne => {
            if stream.is_empty() {
                return Err(Error::EndOfTokenStream);
            }
            match occurrence(node, stream)? {
                Outcome::Matched(0) => Ok(Outcome::Matched(0)),
                Outcome::Matched(first) => lookahead(stream, |stream| {
                    stream.point(first as isize, true);
                    repeat(node, stream, first)
                }),
                failed => Ok(failed),
            }
        }
    }
}

/// Match as many further occurrences of `node` as possible, `already`
/// tokens having been consumed by previous ones.
fn repeat(node: &Node, stream: &mut TokenStream, already: usize) -> Result<Outcome> {
    lookahead(stream, |stream| {
        let mut consumed = already;
        while !stream.is_empty() {
            match occurrence(node, stream)? {
                Outcome::Matched(count) if count > 0 => {
                    stream.point(count as isize, true);
                    consumed += count;
                }
                _ => break,
            }
        }
        Ok(Outcome::Matched(consumed))
    })
}

/// Match a single occurrence of `node`, negation included.
fn occurrence(node: &Node, stream: &mut TokenStream) -> Result<Outcome> {
    let outcome = if node.is_negated() {
        if stream.is_empty() {
            Outcome::Failed(0)
        } else {
            match single(node.kind(), stream)? {
                Outcome::Matched(_) => Outcome::Failed(0),
                Outcome::Failed(_) => Outcome::Matched(1),
            }
        }
    } else {
        single(node.kind(), stream)?
    };
    trace!("{:?} at {:?}: {:?}", node, stream.first(), outcome);
    Ok(outcome)
}

fn single(kind: &NodeKind, stream: &mut TokenStream) -> Result<Outcome> {
    match kind {
        NodeKind::String(_) | NodeKind::Identifier(_) => Ok(match stream.first() {
            Some(token) if kind.accepts(token) => Outcome::Matched(1),
            _ => Outcome::Failed(0),
        }),
        NodeKind::Group(nodes) => sequence(nodes, stream),
        NodeKind::Alternative(branches) => {
            let mut furthest = 0;
            for branch in branches {
                match quantified(branch, stream)? {
                    Outcome::Matched(count) => return Ok(Outcome::Matched(count)),
                    Outcome::Failed(position) => furthest = furthest.max(position),
                }
            }
            Ok(Outcome::Failed(furthest))
        }
    }
}

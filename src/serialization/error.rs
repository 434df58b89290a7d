use std::fmt::Display;

use nom::{
    error::{ContextError, ErrorKind, ParseError},
    IResult, InputLength, Parser,
};

/// What a parser wanted to see at some point of the input
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expected {
    Char(char),
    Token(ErrorKind),
    /// Name of the construct being parsed, added by `context`
    Context(&'static str),
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Char(c) => write!(f, "{:?}", c),
            Expected::Token(ErrorKind::TakeWhile1) => f.write_str("a name"),
            Expected::Token(ErrorKind::Eof) => f.write_str("end of line"),
            Expected::Token(kind) => write!(f, "{}", kind.description()),
            Expected::Context(context) => write!(f, "in {}", context),
        }
    }
}

/// A parse error that keeps only the alternatives that got furthest into the input
///
/// Alternatives that fail at the same place are merged, so the message lists everything
/// that would have been accepted there.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GreedyError<I> {
    /// Input left where the furthest alternative failed
    remaining: I,
    expected: Vec<Expected>,
    contexts: Vec<&'static str>,
}

impl<I> GreedyError<I> {
    pub fn remaining(&self) -> &I {
        &self.remaining
    }

    pub fn expected(&self) -> &[Expected] {
        &self.expected
    }

    /// Innermost construct first
    pub fn contexts(&self) -> &[&'static str] {
        &self.contexts
    }
}

impl GreedyError<&str> {
    /// 1-based character column of the failure, for an error produced from a suffix of
    /// `line`
    pub fn column(&self, line: &str) -> usize {
        let offset = line.len().saturating_sub(self.remaining.len());
        line.get(..offset).map_or(offset, |before| before.chars().count()) + 1
    }
}

impl<I> GreedyError<I> {
    fn expecting(remaining: I, expected: Expected) -> Self {
        GreedyError {
            remaining,
            expected: vec![expected],
            contexts: Vec::new(),
        }
    }
}

impl<I> ParseError<I> for GreedyError<I>
where
    I: InputLength,
{
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Self::expecting(input, Expected::Token(kind))
    }

    // Combinators wrapping a failed parser add nothing a user could act on.
    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: I, c: char) -> Self {
        Self::expecting(input, Expected::Char(c))
    }

    fn or(mut self, other: Self) -> Self {
        let (mine, theirs) = (self.remaining.input_len(), other.remaining.input_len());
        if mine < theirs {
            self
        } else if theirs < mine {
            other
        } else {
            for expected in other.expected {
                if !self.expected.contains(&expected) {
                    self.expected.push(expected);
                }
            }
            self
        }
    }
}

impl<I> ContextError<I> for GreedyError<I> {
    fn add_context(_input: I, ctx: &'static str, mut other: Self) -> Self {
        other.contexts.push(ctx);
        other
    }
}

impl<I> Display for GreedyError<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("expected ")?;
        for (i, expected) in self.expected.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{}", expected)?;
        }
        if let Some(context) = self.contexts.first() {
            write!(f, " in {}", context)?;
        }
        Ok(())
    }
}

/// Turns recoverable errors of `f` into failures, so `alt` stops trying other branches
pub fn or_fail<I, O, E: ParseError<I>, F>(mut f: F) -> impl FnMut(I) -> IResult<I, O, E>
where
    F: Parser<I, O, E>,
{
    move |input| {
        f.parse(input).map_err(|error| match error {
            nom::Err::Error(e) => nom::Err::Failure(e),
            e => e,
        })
    }
}

/// Human readable form of an error from parsing (a suffix of) `line`, with its column
pub fn describe(line: &str, error: nom::Err<GreedyError<&str>>) -> String {
    match error {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            format!("column {}: {}", e.column(line), e)
        }
        nom::Err::Incomplete(_) => "incomplete input".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::{branch::alt, character::complete::char};

    fn fails(input: &str) -> GreedyError<&str> {
        let result: IResult<&str, char, GreedyError<&str>> =
            alt((char('{'), char('}')))(input);
        match result {
            Err(nom::Err::Error(e)) => e,
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn merges_alternatives_at_same_place() {
        let e = fails("x");
        assert_eq!(e.expected(), &[Expected::Char('{'), Expected::Char('}')]);
        assert_eq!(e.to_string(), "expected '{' or '}'");
        assert_eq!(e.column("  x"), 3);
    }

    #[test]
    fn keeps_furthest_alternative() {
        let near = GreedyError::from_char("abc", 'a');
        let far = GreedyError::from_char("c", 'z');
        assert_eq!(near.clone().or(far.clone()), far);
        assert_eq!(far.clone().or(near), far);
    }

    #[test]
    fn column_counts_characters() {
        let line = "∀∀ x";
        let e = GreedyError::from_char(&line[line.len() - 1..], '=');
        assert_eq!(e.column(line), 4);
        assert_eq!(
            describe(line, nom::Err::Failure(e)),
            "column 4: expected '='"
        );
    }
}

//! Parse error types.

use alloc::{
    format,
    string::{String, ToString},
};

use nom::error::{ErrorKind, ParseError as GrammarError};
use thiserror::Error;

/// Result of the grammar parsers.
pub(crate) type IResult<I, O> = nom::IResult<I, O, SyntaxError>;

/// Failure inside the grammar. Of two failed alternatives the one that got
/// further into the input wins, so the reported position is the furthest
/// point any parse attempt reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SyntaxError {
    /// Length of the input left at the failure point
    remaining: usize,
}

impl SyntaxError {
    /// The failure point as a suffix of `source`.
    pub(crate) fn rest_of<'a>(&self, source: &'a str) -> &'a str {
        let start = source.len().saturating_sub(self.remaining);
        source.get(start..).unwrap_or("")
    }
}

impl GrammarError<&str> for SyntaxError {
    fn from_error_kind(input: &str, _kind: ErrorKind) -> Self {
        Self {
            remaining: input.len(),
        }
    }

    fn append(_input: &str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn or(self, other: Self) -> Self {
        if other.remaining < self.remaining {
            other
        } else {
            self
        }
    }
}

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the source text
    pub position: usize,
}

impl ParseError {
    /// One-based line and column of the error in `source`.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let end = self.position.min(source.len());
        let before = source.get(..end).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        (line, column)
    }
}

pub(crate) fn parse_error(original_input: &str, remaining_input: &str, message: &str) -> ParseError {
    ParseError {
        message: message.to_string(),
        position: original_input.len() - remaining_input.len(),
    }
}

/// Error pointing at the remaining input, quoting the start of it.
pub(crate) fn unexpected(original_input: &str, remaining_input: &str, expected: &str) -> ParseError {
    let snippet: String = remaining_input
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .take(24)
        .collect();
    if snippet.is_empty() {
        parse_error(
            original_input,
            remaining_input,
            &format!("expected {}, found end of input", expected),
        )
    } else {
        parse_error(
            original_input,
            remaining_input,
            &format!("expected {}, found '{}'", expected, snippet),
        )
    }
}

/// Error at the furthest point the grammar reached, given that parsing
/// started at `start`.
pub(crate) fn syntax_error(
    original_input: &str,
    start: &str,
    error: nom::Err<SyntaxError>,
    expected: &str,
) -> ParseError {
    let at = match error {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.rest_of(original_input),
        nom::Err::Incomplete(_) => start,
    };
    if at.len() >= start.len() {
        return unexpected(original_input, start, expected);
    }
    match at.lines().next().and_then(|line| line.split_whitespace().next()) {
        Some(token) => parse_error(original_input, at, &format!("unexpected '{}'", token)),
        None => parse_error(original_input, at, "unexpected end of input"),
    }
}

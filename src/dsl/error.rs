//! Syntax errors reported by the filter parser.

use std::fmt;
use thiserror::Error;

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A fixed token such as `and`, `)` or `@type`.
    Literal(&'static str),
    /// A named grammar rule such as `string` or `object type`.
    Rule(&'static str),
    /// The quote that closes a quoted string.
    ClosingQuote(char),
    EndOfInput,
    /// The configured nesting limit was exceeded.
    NestingLimit(usize),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Literal(text) => write!(f, "`{text}`"),
            Expected::Rule(name) => f.write_str(name),
            Expected::ClosingQuote(quote) => write!(f, "closing `{quote}`"),
            Expected::EndOfInput => f.write_str("end of input"),
            Expected::NestingLimit(limit) => write!(f, "nesting depth of at most {limit}"),
        }
    }
}

/// A filter that could not be parsed.
///
/// Lexical problems, grammar mismatches and unconsumed trailing input all
/// surface as this one error. No partial AST is ever returned with it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "expected {} at line {line}, column {column}: \"{remaining}\"",
    describe(.expected)
)]
pub struct FilterSyntaxError {
    /// Byte offset into the input.
    pub offset: usize,
    /// 1-based line of `offset`.
    pub line: usize,
    /// 1-based column of `offset`, counted in characters.
    pub column: usize,
    /// Everything the parser would have accepted at `offset`.
    pub expected: Vec<Expected>,
    /// Unparsed input starting at `offset`.
    pub remaining: String,
}

impl FilterSyntaxError {
    pub(crate) fn new(source: &str, offset: usize, expected: Vec<Expected>) -> Self {
        let consumed = &source[..offset];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |pos| pos + 1);
        let column = consumed[line_start..].chars().count() + 1;

        FilterSyntaxError {
            offset,
            line,
            column,
            expected,
            remaining: source[offset..].to_string(),
        }
    }
}

fn describe(expected: &[Expected]) -> String {
    let labels: Vec<String> = expected.iter().map(ToString::to_string).collect();
    match labels.as_slice() {
        [] => "valid input".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

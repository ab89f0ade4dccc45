//! Recursive-descent parser for the filter language.
//!
//! Grammar (in rough EBNF, alternatives are tried in order and the first
//! match wins):
//!
//! expression  = term ("or" term)*
//! term        = factor ("and" factor)*
//! factor      = "not" factor | "(" expression ")" | primitive
//! primitive   = object_type | tag | string | attribute
//! tag         = string tag_op string ["i"]
//! tag_op      = "=" | "!=" | "~" | "=~" | "!~"
//! attribute   = "@type" "=" object_type
//!             | int_operand int_op int_operand
//!             | str_attr ("=" | "!=") string
//!             | str_attr ("~" | "!~") string
//!             | scope
//! int_operand = int_attr | INTEGER | scope
//! int_op      = "=" | "!=" | "<=" | "<" | ">=" | ">"
//! scope       = ("@tags" | "@nodes" | "@members") "[" expression "]"
//! object_type = "point" | "way" | "relation"
//!
//! Once an opening `(`, `[` or quote, `@type` or a string attribute has been
//! read the parser is committed: a failure after that point is reported
//! immediately instead of trying the next alternative.

use std::str::FromStr;

use tracing::{debug, trace};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;

use super::ast::{Expr, ObjectType};
use super::build;
use super::error::{Expected, FilterSyntaxError};
use super::lexer;
use crate::config::ParseOptions;

/// Where and why a parse stopped.
#[derive(Debug)]
struct Failure {
    offset: usize,
    expected: Vec<Expected>,
}

impl Failure {
    fn at(offset: usize, expected: Expected) -> Self {
        Failure {
            offset,
            expected: vec![expected],
        }
    }
}

#[derive(Debug)]
enum Stop {
    /// Let the enclosing choice try its next alternative.
    Backtrack,
    /// Abort the whole parse.
    Cut(Failure),
}

type Step<T> = Result<T, Stop>;

/// The furthest position any token failed to match, with every label that
/// failed there.
#[derive(Debug, Default)]
struct Furthest {
    offset: usize,
    expected: Vec<Expected>,
}

impl Furthest {
    fn record(&mut self, offset: usize, expected: Expected) {
        if offset > self.offset {
            self.offset = offset;
            self.expected = vec![expected];
        } else if offset == self.offset && !self.expected.contains(&expected) {
            self.expected.push(expected);
        }
    }

    /// Replace token-level labels with a rule name when the rule failed
    /// without getting past its first token.
    fn relabel(&mut self, offset: usize, expected: Expected) {
        if offset == self.offset {
            self.expected = vec![expected];
        }
    }

    fn failure(&self) -> Failure {
        Failure {
            offset: self.offset,
            expected: self.expected.clone(),
        }
    }
}

struct FilterParser<'a> {
    source: &'a str,
    input: &'a str,
    furthest: Furthest,
    depth: usize,
    max_depth: Option<usize>,
}

impl<'a> FilterParser<'a> {
    fn new(source: &'a str, options: &ParseOptions) -> Self {
        FilterParser {
            source,
            input: source,
            furthest: Furthest::default(),
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    fn offset(&self) -> usize {
        self.offset_of(self.input)
    }

    fn offset_of(&self, rest: &str) -> usize {
        self.source.len() - rest.len()
    }

    fn skip(&mut self) {
        let mut rest = self.input;
        if lexer::skip(&mut rest).is_ok() {
            self.input = rest;
        }
    }

    /// Skip, then run one token recognizer at the current position.
    fn token<O>(
        &mut self,
        expected: Expected,
        mut lex: impl Parser<&'a str, O, ErrMode<ContextError>>,
    ) -> Step<O> {
        self.skip();
        let start = self.offset();
        let mut rest = self.input;
        match lex.parse_next(&mut rest) {
            Ok(out) => {
                self.input = rest;
                Ok(out)
            }
            Err(ErrMode::Cut(err)) => {
                let expected = closing_quote(&err).unwrap_or(expected);
                Err(Stop::Cut(Failure::at(self.offset_of(rest), expected)))
            }
            Err(_) => {
                self.furthest.record(start, expected);
                Err(Stop::Backtrack)
            }
        }
    }

    /// Run one alternative of an ordered choice, rewinding if it backtracks.
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Step<T>) -> Step<Option<T>> {
        let checkpoint = self.input;
        match rule(self) {
            Ok(out) => Ok(Some(out)),
            Err(Stop::Backtrack) => {
                trace!(offset = self.offset_of(checkpoint), "backtracking");
                self.input = checkpoint;
                Ok(None)
            }
            Err(cut) => Err(cut),
        }
    }

    /// Anything that fails from here on fails the whole parse.
    fn commit<T>(&mut self, rule: impl FnOnce(&mut Self) -> Step<T>) -> Step<T> {
        match rule(self) {
            Err(Stop::Backtrack) => Err(Stop::Cut(self.furthest.failure())),
            other => other,
        }
    }

    /// Descend one nesting level, enforcing the configured limit.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Step<T>) -> Step<T> {
        if let Some(limit) = self.max_depth {
            if self.depth >= limit {
                self.skip();
                return Err(Stop::Cut(Failure::at(
                    self.offset(),
                    Expected::NestingLimit(limit),
                )));
            }
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn expression(&mut self) -> Step<Expr> {
        let mut terms = vec![self.term()?];
        while let Some(term) = self.attempt(|p| {
            p.token(Expected::Literal("or"), lexer::word("or"))?;
            p.term()
        })? {
            terms.push(term);
        }
        Ok(build::boolean_or(terms))
    }

    fn term(&mut self) -> Step<Expr> {
        let mut factors = vec![self.factor()?];
        while let Some(factor) = self.attempt(|p| {
            p.token(Expected::Literal("and"), lexer::word("and"))?;
            p.factor()
        })? {
            factors.push(factor);
        }
        Ok(build::boolean_and(factors))
    }

    fn factor(&mut self) -> Step<Expr> {
        let negated = self.attempt(|p| {
            p.token(Expected::Literal("not"), lexer::word("not"))?;
            p.nested(Self::factor)
        })?;
        if let Some(expr) = negated {
            return Ok(build::boolean_not(expr));
        }
        if let Some(expr) = self.attempt(Self::paren_expression)? {
            return Ok(expr);
        }
        self.primitive()
    }

    fn paren_expression(&mut self) -> Step<Expr> {
        self.token(Expected::Literal("("), '(')?;
        let expr = self.nested(|p| p.commit(Self::expression))?;
        self.commit(|p| p.token(Expected::Literal(")"), ')'))?;
        Ok(expr)
    }

    fn primitive(&mut self) -> Step<Expr> {
        self.skip();
        let start = self.offset();

        if let Some(object_type) = self.attempt(Self::object_type)? {
            return Ok(build::object_type_check(object_type));
        }
        if let Some(expr) = self.attempt(Self::tag)? {
            return Ok(expr);
        }
        if let Some(expr) = self.attempt(Self::key)? {
            return Ok(expr);
        }
        if let Some(expr) = self.attempt(Self::attribute)? {
            return Ok(expr);
        }

        self.furthest.relabel(start, Expected::Rule("condition"));
        Err(Stop::Backtrack)
    }

    fn object_type(&mut self) -> Step<ObjectType> {
        self.token(Expected::Rule("object type"), lexer::object_type)
    }

    fn tag(&mut self) -> Step<Expr> {
        let key = self.token(Expected::Rule("tag key"), lexer::string)?;
        let op = self.token(Expected::Rule("tag comparison operator"), lexer::tag_operator)?;
        let value = self.token(Expected::Rule("string"), lexer::string)?;
        let case_insensitive = if build::is_regex_operator(op) {
            self.attempt(|p| p.token(Expected::Literal("i"), lexer::case_flag))?
                .is_some()
        } else {
            false
        };
        build::tag_comparison(key, op, value, case_insensitive).ok_or(Stop::Backtrack)
    }

    fn key(&mut self) -> Step<Expr> {
        let key = self.token(Expected::Rule("tag key"), lexer::string)?;
        Ok(build::has_key(key))
    }

    fn attribute(&mut self) -> Step<Expr> {
        if let Some(object_type) = self.attempt(Self::type_attribute)? {
            return Ok(build::object_type_check(object_type));
        }
        if let Some(left) = self.attempt(Self::int_operand)? {
            return self.int_comparison(left);
        }
        self.str_comparison()
    }

    /// `@type = way`; only equality is valid here.
    fn type_attribute(&mut self) -> Step<ObjectType> {
        self.token(Expected::Literal("@type"), lexer::word("@type"))?;
        self.commit(|p| {
            p.token(Expected::Literal("="), '=')?;
            p.object_type()
        })
    }

    /// Continue an integer comparison from its parsed left operand. A scope
    /// with no operator after it stands alone, so its brackets are never
    /// parsed twice.
    fn int_comparison(&mut self, left: Expr) -> Step<Expr> {
        let rest = self.attempt(|p| {
            let op = p.token(
                Expected::Rule("integer comparison operand"),
                lexer::int_operator,
            )?;
            let right = p.int_operand()?;
            Ok((op, right))
        })?;
        match rest {
            Some((op, right)) => Ok(build::int_bin_op(left, op, right)),
            None if is_scope(&left) => Ok(left),
            None => Err(Stop::Backtrack),
        }
    }

    fn int_operand(&mut self) -> Step<Expr> {
        let attr = self.attempt(|p| {
            p.token(Expected::Rule("integer attribute"), lexer::int_attribute)
        })?;
        if let Some(attr) = attr {
            return Ok(build::int_attr(attr));
        }
        if let Some(value) = self.attempt(Self::int_value)? {
            return Ok(value);
        }
        self.scope()
    }

    fn int_value(&mut self) -> Step<Expr> {
        self.skip();
        let start = self.offset();
        let text = self.token(Expected::Rule("integer value"), lexer::integer)?;
        match text.parse::<i64>() {
            Ok(value) => Ok(build::int_literal(value)),
            Err(_) => Err(Stop::Cut(Failure::at(
                start,
                Expected::Rule("64-bit integer"),
            ))),
        }
    }

    /// A string attribute commits to a string comparison.
    fn str_comparison(&mut self) -> Step<Expr> {
        let attr = self.token(Expected::Rule("string attribute"), lexer::str_attribute)?;
        self.commit(|p| {
            let equality = p.attempt(|p| {
                p.token(
                    Expected::Rule("string comparison operand"),
                    lexer::str_equality_operator,
                )
            })?;
            if let Some(op) = equality {
                let value = p.commit(|p| p.token(Expected::Rule("string value"), lexer::string))?;
                return Ok(build::str_bin_op(attr, op, value));
            }

            let op = p.token(
                Expected::Rule("string regex comparison operand"),
                lexer::str_match_operator,
            )?;
            let pattern = p.commit(|p| p.token(Expected::Rule("regex value"), lexer::string))?;
            Ok(build::str_bin_op(attr, op, pattern))
        })
    }

    fn scope(&mut self) -> Step<Expr> {
        let kind = self.token(Expected::Rule("scope"), lexer::scope_kind)?;
        self.token(Expected::Literal("["), '[')?;
        let inner = self.nested(|p| p.commit(Self::expression))?;
        self.commit(|p| p.token(Expected::Literal("]"), ']'))?;
        Ok(build::scope(kind, inner))
    }

    /// Parse one expression and require that only skippable text follows it.
    fn parse(mut self) -> Result<Expr, FilterSyntaxError> {
        let failure = match self.expression() {
            Ok(expr) => {
                self.skip();
                if self.input.is_empty() {
                    return Ok(expr);
                }
                self.furthest.record(self.offset(), Expected::EndOfInput);
                self.furthest.failure()
            }
            Err(Stop::Backtrack) => self.furthest.failure(),
            Err(Stop::Cut(failure)) => failure,
        };
        Err(FilterSyntaxError::new(
            self.source,
            failure.offset,
            failure.expected,
        ))
    }
}

fn is_scope(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::TagsScope(_) | Expr::NodesScope(_) | Expr::MembersScope(_)
    )
}

/// The quote a quoted string was missing, if that is why the lexer cut.
fn closing_quote(err: &ContextError) -> Option<Expected> {
    err.context().find_map(|ctx| match ctx {
        StrContext::Expected(StrContextValue::CharLiteral(quote)) => {
            Some(Expected::ClosingQuote(*quote))
        }
        _ => None,
    })
}

/// Parse a filter expression with default options.
pub fn parse_filter(input: &str) -> Result<Expr, FilterSyntaxError> {
    parse_filter_with(input, &ParseOptions::default())
}

/// Parse a filter expression.
///
/// The whole input must be one expression; anything left over other than
/// whitespace and comments is an error.
pub fn parse_filter_with(input: &str, options: &ParseOptions) -> Result<Expr, FilterSyntaxError> {
    debug!(len = input.len(), "Parsing filter");
    let result = FilterParser::new(input, options).parse();
    match &result {
        Ok(expr) => debug!(depth = expr.depth(), "Parsed filter"),
        Err(err) => debug!(offset = err.offset, "Filter syntax error: {}", err),
    }
    result
}

impl FromStr for Expr {
    type Err = FilterSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_filter(s)
    }
}

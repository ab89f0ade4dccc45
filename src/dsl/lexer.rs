//! Token recognizers for the filter language.
//!
//! There is no separate tokenizing pass: the parser calls these on demand at
//! its current position, which lets each grammar rule pick the operator
//! spellings it accepts.

use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, delimited, not, opt, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use super::ast::{IntAttribute, IntOp, ObjectType, StrAttribute, StrOp};
use super::build::ScopeKind;

// Recognizers keep winnow's ErrMode so an unterminated quote can cut the parse
pub(crate) type PResult<T> = Result<T, ErrMode<ContextError>>;

pub(crate) fn is_plain_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub(crate) fn is_plain_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ':' || c == '_'
}

/// `#` up to and including the end of the line, or to end of input.
fn comment(input: &mut &str) -> PResult<()> {
    ('#', take_till(0.., '\n'), opt('\n')).void().parse_next(input)
}

/// Skip ASCII whitespace and comments.
pub(crate) fn skip(input: &mut &str) -> PResult<()> {
    repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            comment,
        )),
    )
    .parse_next(input)
}

/// Unquoted string: `[a-zA-Z][a-zA-Z0-9:_]*`
pub(crate) fn plain_string<'i>(input: &mut &'i str) -> PResult<&'i str> {
    (one_of(is_plain_start), take_while(0.., is_plain_continue))
        .take()
        .parse_next(input)
}

/// Everything up to the matching quote. There are no escapes; once the
/// opening quote is seen a missing closing quote is fatal.
fn quoted<'i>(quote: char) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    delimited(
        quote,
        take_till(0.., quote),
        cut_err(quote).context(StrContext::Expected(StrContextValue::CharLiteral(quote))),
    )
}

/// Plain, single-quoted or double-quoted string, first match wins.
pub(crate) fn string<'i>(input: &mut &'i str) -> PResult<&'i str> {
    alt((plain_string, quoted('\''), quoted('"'))).parse_next(input)
}

/// Optionally signed decimal digits. Range checking is left to the caller.
pub(crate) fn integer<'i>(input: &mut &'i str) -> PResult<&'i str> {
    (opt(one_of(['+', '-'])), digit1).take().parse_next(input)
}

/// A fixed word that may not run on into a plain string.
pub(crate) fn word<'i>(text: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    terminated(text, not(one_of(is_plain_continue)))
}

pub(crate) fn object_type(input: &mut &str) -> PResult<ObjectType> {
    alt((
        word("point").value(ObjectType::Point),
        word("way").value(ObjectType::Way),
        word("relation").value(ObjectType::Relation),
    ))
    .parse_next(input)
}

pub(crate) fn int_attribute(input: &mut &str) -> PResult<IntAttribute> {
    alt((
        word("@id").value(IntAttribute::Id),
        word("@version").value(IntAttribute::Version),
        word("@uid").value(IntAttribute::Uid),
        word("@changeset").value(IntAttribute::Changeset),
        word("@ref").value(IntAttribute::Ref),
    ))
    .parse_next(input)
}

pub(crate) fn str_attribute(input: &mut &str) -> PResult<StrAttribute> {
    alt((
        word("@user").value(StrAttribute::User),
        word("@key").value(StrAttribute::Key),
        word("@value").value(StrAttribute::Value),
        word("@role").value(StrAttribute::Role),
    ))
    .parse_next(input)
}

pub(crate) fn scope_kind(input: &mut &str) -> PResult<ScopeKind> {
    alt((
        word("@tags").value(ScopeKind::Tags),
        word("@nodes").value(ScopeKind::Nodes),
        word("@members").value(ScopeKind::Members),
    ))
    .parse_next(input)
}

/// Tag comparison operator, returned as written. `=~` is tried before `=`
/// so the alias is never split.
pub(crate) fn tag_operator<'i>(input: &mut &'i str) -> PResult<&'i str> {
    alt(("=~", "!=", "!~", "=", "~")).parse_next(input)
}

pub(crate) fn int_operator(input: &mut &str) -> PResult<IntOp> {
    alt((
        "=".value(IntOp::Equal),
        "!=".value(IntOp::NotEqual),
        "<=".value(IntOp::LessOrEqual),
        "<".value(IntOp::Less),
        ">=".value(IntOp::GreaterOrEqual),
        ">".value(IntOp::Greater),
    ))
    .parse_next(input)
}

/// Attribute equality operator. Unlike tags, `=~` is not a spelling here.
pub(crate) fn str_equality_operator(input: &mut &str) -> PResult<StrOp> {
    alt(("=".value(StrOp::Equal), "!=".value(StrOp::NotEqual))).parse_next(input)
}

pub(crate) fn str_match_operator(input: &mut &str) -> PResult<StrOp> {
    alt(("~".value(StrOp::Match), "!~".value(StrOp::NotMatch))).parse_next(input)
}

/// Case-insensitivity flag after a tag regex.
pub(crate) fn case_flag<'i>(input: &mut &'i str) -> PResult<&'i str> {
    word("i").parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<'i, O>(
        mut parser: impl Parser<&'i str, O, ErrMode<ContextError>>,
        input: &'i str,
    ) -> (Option<O>, &'i str) {
        let mut rest = input;
        let result = parser.parse_next(&mut rest).ok();
        (result, rest)
    }

    #[test]
    fn test_skip_whitespace_and_comments() {
        let (result, rest) = run(skip, "  # first\n\t# second\n  point");
        assert!(result.is_some());
        assert_eq!(rest, "point");
    }

    #[test]
    fn test_comment_at_end_of_input() {
        let (result, rest) = run(skip, " # trailing");
        assert!(result.is_some());
        assert_eq!(rest, "");
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(run(plain_string, "addr:street_2=x"), (Some("addr:street_2"), "=x"));
        assert!(run(plain_string, "2nd").0.is_none());
        assert!(run(plain_string, "_x").0.is_none());
    }

    #[test]
    fn test_quoted_strings_have_no_escapes() {
        assert_eq!(run(string, "'a b\"c' rest"), (Some("a b\"c"), " rest"));
        assert_eq!(run(string, "\"it's\""), (Some("it's"), ""));
        assert_eq!(run(string, "''"), (Some(""), ""));
    }

    #[test]
    fn test_unterminated_quote_is_cut() {
        let mut rest = "'abc";
        let result = string(&mut rest);
        assert!(matches!(result, Err(ErrMode::Cut(_))));
    }

    #[test]
    fn test_integer() {
        assert_eq!(run(integer, "-42)"), (Some("-42"), ")"));
        assert_eq!(run(integer, "+7"), (Some("+7"), ""));
        assert!(run(integer, "-x").0.is_none());
    }

    #[test]
    fn test_word_boundary() {
        assert_eq!(run(object_type, "way]"), (Some(ObjectType::Way), "]"));
        assert!(run(object_type, "wayside").0.is_none());
        assert!(run(word("not"), "notable").0.is_none());
        assert!(run(int_attribute, "@identity").0.is_none());
    }

    #[test]
    fn test_tag_operator_spellings() {
        assert_eq!(run(tag_operator, "=~x"), (Some("=~"), "x"));
        assert_eq!(run(tag_operator, "!~x"), (Some("!~"), "x"));
        assert_eq!(run(tag_operator, "!=x"), (Some("!="), "x"));
        assert_eq!(run(tag_operator, "=x"), (Some("="), "x"));
        assert_eq!(run(tag_operator, "~x"), (Some("~"), "x"));
    }

    #[test]
    fn test_int_operator_prefers_longer_spelling() {
        assert_eq!(run(int_operator, "<=5"), (Some(IntOp::LessOrEqual), "5"));
        assert_eq!(run(int_operator, ">5"), (Some(IntOp::Greater), "5"));
    }

    #[test]
    fn test_attribute_equality_leaves_tilde() {
        assert_eq!(run(str_equality_operator, "=~'x'"), (Some(StrOp::Equal), "~'x'"));
        assert!(run(str_match_operator, "=~'x'").0.is_none());
    }
}

//! AST construction.
//!
//! Each grammar rule hands its matched pieces to one of these functions, so
//! node creation happens only here. Everything is built from owned values,
//! which means a parse that fails halfway simply drops what it built.

use super::ast::{
    EqualityOp, Expr, IntAttribute, IntOp, MatchOp, ObjectType, StrAttribute, StrOp,
};

/// The collection a bracketed sub-expression applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    Tags,
    Nodes,
    Members,
}

pub(crate) fn boolean_or(mut exprs: Vec<Expr>) -> Expr {
    debug_assert!(!exprs.is_empty());
    if exprs.len() == 1 {
        exprs.remove(0)
    } else {
        Expr::Or(exprs)
    }
}

pub(crate) fn boolean_and(mut exprs: Vec<Expr>) -> Expr {
    debug_assert!(!exprs.is_empty());
    if exprs.len() == 1 {
        exprs.remove(0)
    } else {
        Expr::And(exprs)
    }
}

pub(crate) fn boolean_not(expr: Expr) -> Expr {
    Expr::Not(Box::new(expr))
}

pub(crate) fn has_key(key: &str) -> Expr {
    Expr::HasKey(key.to_string())
}

/// True when a tag operator spelling selects regex matching.
pub(crate) fn is_regex_operator(op: &str) -> bool {
    matches!(op, "~" | "=~" | "!~")
}

/// Build a tag comparison from the operator as it was written.
///
/// `=`/`!=` compare strings; `~`, its alias `=~`, and `!~` match a regex.
/// The case flag only applies to the regex family.
pub(crate) fn tag_comparison(
    key: &str,
    op: &str,
    value: &str,
    case_insensitive: bool,
) -> Option<Expr> {
    let expr = match op {
        "=" => tag_str_compare(key, EqualityOp::Equal, value),
        "!=" => tag_str_compare(key, EqualityOp::NotEqual, value),
        "~" | "=~" => tag_regex_compare(key, MatchOp::Match, value, case_insensitive),
        "!~" => tag_regex_compare(key, MatchOp::NotMatch, value, case_insensitive),
        _ => return None,
    };
    Some(expr)
}

fn tag_str_compare(key: &str, op: EqualityOp, value: &str) -> Expr {
    Expr::TagStrCompare {
        key: key.to_string(),
        op,
        value: value.to_string(),
    }
}

fn tag_regex_compare(key: &str, op: MatchOp, pattern: &str, case_insensitive: bool) -> Expr {
    Expr::TagRegexCompare {
        key: key.to_string(),
        op,
        pattern: pattern.to_string(),
        case_insensitive,
    }
}

pub(crate) fn object_type_check(object_type: ObjectType) -> Expr {
    Expr::ObjectTypeCheck(object_type)
}

pub(crate) fn int_attr(attr: IntAttribute) -> Expr {
    Expr::IntAttr(attr)
}

pub(crate) fn int_literal(value: i64) -> Expr {
    Expr::IntLiteral(value)
}

pub(crate) fn scope(kind: ScopeKind, inner: Expr) -> Expr {
    let inner = Box::new(inner);
    match kind {
        ScopeKind::Tags => Expr::TagsScope(inner),
        ScopeKind::Nodes => Expr::NodesScope(inner),
        ScopeKind::Members => Expr::MembersScope(inner),
    }
}

pub(crate) fn int_bin_op(left: Expr, op: IntOp, right: Expr) -> Expr {
    Expr::IntBinOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// The right operand is a string literal for `=`/`!=` and a regex for `~`/`!~`.
pub(crate) fn str_bin_op(attr: StrAttribute, op: StrOp, value: &str) -> Expr {
    let right = if op.is_regex() {
        Expr::RegexLiteral(value.to_string())
    } else {
        Expr::StrLiteral(value.to_string())
    };
    Expr::StrBinOp {
        left: Box::new(Expr::StrAttr(attr)),
        op,
        right: Box::new(right),
    }
}

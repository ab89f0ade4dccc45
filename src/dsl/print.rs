//! Canonical text form of a filter.
//!
//! Parsing the printed form of a parsed filter gives back an equal AST.

use std::fmt;

use super::ast::Expr;
use super::lexer::{is_plain_continue, is_plain_start};

/// Words that mean something else when written bare.
const RESERVED: [&str; 7] = ["and", "or", "not", "point", "way", "relation", "i"];

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Or(exprs) => write_joined(f, exprs, " or ", |e| matches!(e, Expr::Or(_))),
            Expr::And(exprs) => write_joined(f, exprs, " and ", |e| {
                matches!(e, Expr::And(_) | Expr::Or(_))
            }),
            Expr::Not(inner) => {
                f.write_str("not ")?;
                write_grouped(f, inner, matches!(**inner, Expr::And(_) | Expr::Or(_)))
            }
            Expr::HasKey(key) => write_string(f, key),
            Expr::TagStrCompare { key, op, value } => {
                write_string(f, key)?;
                write!(f, "{op}")?;
                write_string(f, value)
            }
            Expr::TagRegexCompare {
                key,
                op,
                pattern,
                case_insensitive,
            } => {
                write_string(f, key)?;
                write!(f, "{op}")?;
                write_quoted(f, pattern)?;
                if *case_insensitive {
                    f.write_str("i")?;
                }
                Ok(())
            }
            Expr::ObjectTypeCheck(object_type) => write!(f, "{object_type}"),
            Expr::IntAttr(attr) => write!(f, "{attr}"),
            Expr::StrAttr(attr) => write!(f, "{attr}"),
            Expr::TagsScope(inner) => write!(f, "@tags[{inner}]"),
            Expr::NodesScope(inner) => write!(f, "@nodes[{inner}]"),
            Expr::MembersScope(inner) => write!(f, "@members[{inner}]"),
            Expr::IntBinOp { left, op, right } => write!(f, "{left}{op}{right}"),
            Expr::StrBinOp { left, op, right } => write!(f, "{left}{op}{right}"),
            Expr::IntLiteral(value) => write!(f, "{value}"),
            Expr::StrLiteral(value) => write_string(f, value),
            Expr::RegexLiteral(pattern) => write_quoted(f, pattern),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    exprs: &[Expr],
    separator: &str,
    needs_parens: impl Fn(&Expr) -> bool,
) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write_grouped(f, expr, needs_parens(expr))?;
    }
    Ok(())
}

fn write_grouped(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn is_bare(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_plain_start)
        && chars.all(is_plain_continue)
        && !RESERVED.contains(&s)
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    if is_bare(s) {
        f.write_str(s)
    } else {
        write_quoted(f, s)
    }
}

/// Strings holding both quote characters cannot be written in the language;
/// those come out double-quoted and will not parse back.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    if s.contains('"') && !s.contains('\'') {
        write!(f, "'{s}'")
    } else {
        write!(f, "\"{s}\"")
    }
}

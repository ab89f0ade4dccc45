//! AST types for the object filter language.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed filter expression.
///
/// Every parse yields exactly one root node which owns its whole subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// All children must hold. Never empty and never unary.
    And(Vec<Expr>),

    /// Any child must hold. Never empty and never unary.
    Or(Vec<Expr>),

    /// Negation: `not expr`
    Not(Box<Expr>),

    /// Tag existence: `highway`
    HasKey(String),

    /// Tag value comparison: `amenity=restaurant`, `amenity!=cafe`
    TagStrCompare {
        key: String,
        op: EqualityOp,
        value: String,
    },

    /// Tag value regex match: `name~'^Pizza'i`, `name!~x`
    TagRegexCompare {
        key: String,
        op: MatchOp,
        pattern: String,
        case_insensitive: bool,
    },

    /// Object kind: `way` or `@type=way`
    ObjectTypeCheck(ObjectType),

    /// Integer attribute reference, only found as an `IntBinOp` operand.
    IntAttr(IntAttribute),

    /// String attribute reference, only found as the left side of a `StrBinOp`.
    StrAttr(StrAttribute),

    /// `@tags[expr]`
    TagsScope(Box<Expr>),

    /// `@nodes[expr]`
    NodesScope(Box<Expr>),

    /// `@members[expr]`
    MembersScope(Box<Expr>),

    /// Integer comparison. Operands are `IntAttr`, `IntLiteral` or a scope.
    IntBinOp {
        left: Box<Expr>,
        op: IntOp,
        right: Box<Expr>,
    },

    /// String comparison. `left` is always a `StrAttr`; `right` is a `StrLiteral`
    /// for the equality family and a `RegexLiteral` for the match family.
    StrBinOp {
        left: Box<Expr>,
        op: StrOp,
        right: Box<Expr>,
    },

    IntLiteral(i64),

    StrLiteral(String),

    /// Raw regex source. Compiling it is up to the evaluator.
    RegexLiteral(String),
}

impl Expr {
    /// Direct sub-expressions in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => exprs.iter().collect(),
            Expr::Not(inner)
            | Expr::TagsScope(inner)
            | Expr::NodesScope(inner)
            | Expr::MembersScope(inner) => vec![inner.as_ref()],
            Expr::IntBinOp { left, right, .. } | Expr::StrBinOp { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            Expr::HasKey(_)
            | Expr::TagStrCompare { .. }
            | Expr::TagRegexCompare { .. }
            | Expr::ObjectTypeCheck(_)
            | Expr::IntAttr(_)
            | Expr::StrAttr(_)
            | Expr::IntLiteral(_)
            | Expr::StrLiteral(_)
            | Expr::RegexLiteral(_) => Vec::new(),
        }
    }

    /// Height of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expr::depth)
            .max()
            .unwrap_or(0)
    }
}

/// OSM object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Point,
    Way,
    Relation,
}

impl ObjectType {
    pub const ALL: [ObjectType; 3] = [ObjectType::Point, ObjectType::Way, ObjectType::Relation];

    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Point => "point",
            ObjectType::Way => "way",
            ObjectType::Relation => "relation",
        }
    }
}

/// Integer-valued object attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntAttribute {
    Id,
    Version,
    Uid,
    Changeset,
    Ref,
}

impl IntAttribute {
    pub const ALL: [IntAttribute; 5] = [
        IntAttribute::Id,
        IntAttribute::Version,
        IntAttribute::Uid,
        IntAttribute::Changeset,
        IntAttribute::Ref,
    ];

    /// Surface spelling without the leading `@`.
    pub fn name(self) -> &'static str {
        match self {
            IntAttribute::Id => "id",
            IntAttribute::Version => "version",
            IntAttribute::Uid => "uid",
            IntAttribute::Changeset => "changeset",
            IntAttribute::Ref => "ref",
        }
    }
}

/// String-valued object attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrAttribute {
    User,
    Key,
    Value,
    Role,
}

impl StrAttribute {
    pub const ALL: [StrAttribute; 4] = [
        StrAttribute::User,
        StrAttribute::Key,
        StrAttribute::Value,
        StrAttribute::Role,
    ];

    /// Surface spelling without the leading `@`.
    pub fn name(self) -> &'static str {
        match self {
            StrAttribute::User => "user",
            StrAttribute::Key => "key",
            StrAttribute::Value => "value",
            StrAttribute::Role => "role",
        }
    }
}

/// Tag string comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EqualityOp {
    Equal,    // =
    NotEqual, // !=
}

/// Tag regex operator. `=~` is stored as `Match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOp {
    Match,    // ~
    NotMatch, // !~
}

/// Integer comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntOp {
    Equal,          // =
    NotEqual,       // !=
    Less,           // <
    LessOrEqual,    // <=
    Greater,        // >
    GreaterOrEqual, // >=
}

/// Attribute string comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrOp {
    Equal,    // =
    NotEqual, // !=
    Match,    // ~
    NotMatch, // !~
}

impl StrOp {
    /// True for `~` and `!~`, whose right operand is a regex.
    pub fn is_regex(self) -> bool {
        matches!(self, StrOp::Match | StrOp::NotMatch)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for IntAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

impl fmt::Display for StrAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

impl fmt::Display for EqualityOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EqualityOp::Equal => write!(f, "="),
            EqualityOp::NotEqual => write!(f, "!="),
        }
    }
}

impl fmt::Display for MatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOp::Match => write!(f, "~"),
            MatchOp::NotMatch => write!(f, "!~"),
        }
    }
}

impl fmt::Display for IntOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntOp::Equal => write!(f, "="),
            IntOp::NotEqual => write!(f, "!="),
            IntOp::Less => write!(f, "<"),
            IntOp::LessOrEqual => write!(f, "<="),
            IntOp::Greater => write!(f, ">"),
            IntOp::GreaterOrEqual => write!(f, ">="),
        }
    }
}

impl fmt::Display for StrOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrOp::Equal => write!(f, "="),
            StrOp::NotEqual => write!(f, "!="),
            StrOp::Match => write!(f, "~"),
            StrOp::NotMatch => write!(f, "!~"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> Expr {
        Expr::HasKey(k.into())
    }

    #[test]
    fn test_leaf_depth() {
        assert_eq!(key("name").depth(), 1);
        assert!(key("name").children().is_empty());
    }

    #[test]
    fn test_nested_depth() {
        let expr = Expr::And(vec![
            key("a"),
            Expr::Not(Box::new(Expr::TagsScope(Box::new(key("b"))))),
        ]);
        assert_eq!(expr.depth(), 4);
        assert_eq!(expr.children().len(), 2);
    }

    #[test]
    fn test_binop_children_order() {
        let expr = Expr::IntBinOp {
            left: Box::new(Expr::IntAttr(IntAttribute::Id)),
            op: IntOp::Less,
            right: Box::new(Expr::IntLiteral(5)),
        };
        assert_eq!(
            expr.children(),
            vec![&Expr::IntAttr(IntAttribute::Id), &Expr::IntLiteral(5)]
        );
    }

    #[test]
    fn test_operator_spelling() {
        assert_eq!(IntOp::GreaterOrEqual.to_string(), ">=");
        assert_eq!(StrOp::NotMatch.to_string(), "!~");
        assert_eq!(MatchOp::Match.to_string(), "~");
        assert_eq!(EqualityOp::NotEqual.to_string(), "!=");
        assert_eq!(IntAttribute::Changeset.to_string(), "@changeset");
        assert_eq!(StrAttribute::Role.to_string(), "@role");
        assert_eq!(ObjectType::Relation.to_string(), "relation");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Expr::ObjectTypeCheck(ObjectType::Way)).unwrap();
        assert_eq!(json, r#"{"ObjectTypeCheck":"way"}"#);
    }
}

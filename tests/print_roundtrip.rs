//! Printing a filter and parsing the text again gives back the same tree.

use osm_object_filter::dsl::{
    EqualityOp, Expr, IntAttribute, IntOp, MatchOp, ObjectType, StrAttribute, StrOp,
};
use osm_object_filter::parse_filter;
use proptest::prelude::*;
use proptest::sample::select;

/// Keys and values, including ones that must be quoted to survive.
fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z][a-zA-Z0-9:_]{0,8}",
        "[ a-z0-9#@()=~!<>\\[\\]]{0,8}",
        "[a-z\"]{1,6}",
        select(vec!["and", "or", "not", "point", "way", "relation", "i"]).prop_map(String::from),
    ]
}

fn int_ops() -> impl Strategy<Value = IntOp> {
    select(vec![
        IntOp::Equal,
        IntOp::NotEqual,
        IntOp::Less,
        IntOp::LessOrEqual,
        IntOp::Greater,
        IntOp::GreaterOrEqual,
    ])
}

fn int_operand() -> impl Strategy<Value = Expr> {
    prop_oneof![
        select(IntAttribute::ALL.to_vec()).prop_map(Expr::IntAttr),
        any::<i64>().prop_map(Expr::IntLiteral),
    ]
}

fn scope(kind: usize, inner: Expr) -> Expr {
    let inner = Box::new(inner);
    match kind {
        0 => Expr::TagsScope(inner),
        1 => Expr::NodesScope(inner),
        _ => Expr::MembersScope(inner),
    }
}

fn primitive() -> impl Strategy<Value = Expr> {
    prop_oneof![
        text().prop_map(Expr::HasKey),
        (
            text(),
            select(vec![EqualityOp::Equal, EqualityOp::NotEqual]),
            text()
        )
            .prop_map(|(key, op, value)| Expr::TagStrCompare { key, op, value }),
        (
            text(),
            select(vec![MatchOp::Match, MatchOp::NotMatch]),
            text(),
            any::<bool>()
        )
            .prop_map(|(key, op, pattern, case_insensitive)| Expr::TagRegexCompare {
                key,
                op,
                pattern,
                case_insensitive,
            }),
        select(ObjectType::ALL.to_vec()).prop_map(Expr::ObjectTypeCheck),
        (int_operand(), int_ops(), int_operand()).prop_map(|(left, op, right)| Expr::IntBinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }),
        (
            select(StrAttribute::ALL.to_vec()),
            select(vec![StrOp::Equal, StrOp::NotEqual, StrOp::Match, StrOp::NotMatch]),
            text()
        )
            .prop_map(|(attr, op, value)| {
                let right = if op.is_regex() {
                    Expr::RegexLiteral(value)
                } else {
                    Expr::StrLiteral(value)
                };
                Expr::StrBinOp {
                    left: Box::new(Expr::StrAttr(attr)),
                    op,
                    right: Box::new(right),
                }
            }),
    ]
}

fn filter() -> impl Strategy<Value = Expr> {
    primitive().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(Expr::And),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Expr::Or),
            inner.clone().prop_map(|e| Expr::Not(Box::new(e))),
            (0..3usize, inner.clone()).prop_map(|(kind, e)| scope(kind, e)),
            (0..3usize, inner, int_ops(), int_operand()).prop_map(|(kind, e, op, right)| {
                Expr::IntBinOp {
                    left: Box::new(scope(kind, e)),
                    op,
                    right: Box::new(right),
                }
            }),
        ]
    })
}

proptest! {
    #[test]
    fn printed_filters_parse_back(expr in filter()) {
        let text = expr.to_string();
        let reparsed = parse_filter(&text);
        prop_assert_eq!(reparsed.as_ref(), Ok(&expr), "printed as {}", text);
    }
}

#[test]
fn every_variant_survives_printing() {
    let source = "not (way or @type=relation) and amenity!=bar and name!~'x'i \
                  and @uid>=1 and @user='me' and @role~outer \
                  and @members[@nodes[\"and\"] < @version] = 3";
    let expr = parse_filter(source).unwrap();
    assert_eq!(parse_filter(&expr.to_string()).unwrap(), expr);
}

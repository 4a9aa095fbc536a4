//! Round-trip law for the literal codec.
//!
//! Decoding a canonical encoding must give back the value that produced it,
//! and truncating any encoded container must be rejected outright rather than
//! decoded into a shorter container.

use kpi_literal::{encode_list, parse_list, parse_literal, Literal, LiteralMap};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Literal> {
    prop_oneof![
        Just(Literal::None),
        any::<bool>().prop_map(Literal::Bool),
        any::<i64>().prop_map(Literal::Int),
        any::<f64>()
            .prop_filter("finite decimals only", |d| d.is_finite())
            .prop_map(Literal::Decimal),
        ".*".prop_map(Literal::Str),
    ]
}

fn literal() -> impl Strategy<Value = Literal> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Literal::List),
            prop::collection::vec((".{0,8}", inner), 0..6)
                .prop_map(|pairs| Literal::Map(pairs.into_iter().collect::<LiteralMap>())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_decode_of_encode_is_identity(value in literal()) {
        let text = value.encode();
        let decoded = parse_literal(&text).unwrap();
        prop_assert_eq!(&decoded, &value);
    }

    #[test]
    fn prop_parse_serialize_parse_is_idempotent(value in literal()) {
        let first = parse_literal(&value.encode()).unwrap();
        let second = parse_literal(&first.encode()).unwrap();
        prop_assert_eq!(first.encode(), second.encode());
    }

    #[test]
    fn prop_truncated_list_is_rejected(items in prop::collection::vec(scalar(), 0..6)) {
        let text = encode_list(&items);
        let truncated = &text[..text.len() - 1];
        prop_assert!(parse_list(truncated).is_err());
    }
}

#[test]
fn whitespace_variants_decode_alike() {
    let compact = parse_literal("{'a':[1,2],'b':'x'}").unwrap();
    let spaced = parse_literal("{ 'a' : [ 1 , 2 ] ,\t'b' : \"x\" }").unwrap();
    assert_eq!(compact, spaced);
}

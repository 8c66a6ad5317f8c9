//! Serialization properties over generated trees.
//!
//! For any tree `v`: parsing `v.dump()` yields `v` again (key order
//! included), and dumping that result reproduces the same text.

use jsondoc::{parse_str, Map, Value};
use proptest::prelude::*;

fn arb_number() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1_000_000i64..1_000_000).prop_map(|n| n as f64),
        any::<f64>().prop_filter("finite", |n| n.is_finite()),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_number().prop_map(Value::Number),
        any::<String>().prop_map(Value::String),
    ];
    leaf.prop_recursive(5, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((any::<String>(), inner), 0..6).prop_map(|pairs| {
                // Later duplicates overwrite in place, like a last-wins parse
                Value::Object(pairs.into_iter().collect::<Map>())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn dump_then_parse_is_identity(value in arb_value()) {
        let text = value.dump();
        let parsed = parse_str(&text).unwrap();
        prop_assert_eq!(&parsed, &value);
    }

    #[test]
    fn dump_is_idempotent(value in arb_value()) {
        let once = value.dump();
        let twice = parse_str(&once).unwrap().dump();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn pretty_dump_parses_to_same_tree(value in arb_value(), indent in 0usize..5) {
        let parsed = parse_str(&value.dump_pretty(indent)).unwrap();
        prop_assert_eq!(&parsed, &value);
    }
}

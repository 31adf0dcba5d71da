// SPDX-License-Identifier: Apache-2.0

use bijux_probe_core::json::compare_values;
use proptest::prelude::*;
use proptest::test_runner::Config;
use serde_json::json;
use std::cmp::Ordering;

proptest! {
    #![proptest_config(Config::with_cases(256))]
    #[test]
    fn integer_ordering_matches_native_ordering(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(compare_values(&json!(a), &json!(b), true), Some(a.cmp(&b)));
    }

    #[test]
    fn string_ordering_is_antisymmetric(a in ".{0,12}", b in ".{0,12}", sensitive in any::<bool>()) {
        let forward = compare_values(&json!(a), &json!(b), sensitive).expect("strings compare");
        let backward = compare_values(&json!(b), &json!(a), sensitive).expect("strings compare");
        prop_assert_eq!(forward, backward.reverse());
    }

    #[test]
    fn number_never_compares_with_string(a in any::<i32>(), b in "[a-z0-9]{0,6}") {
        prop_assert_eq!(compare_values(&json!(a), &json!(b), true), None::<Ordering>);
    }
}

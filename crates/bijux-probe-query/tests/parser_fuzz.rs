// SPDX-License-Identifier: Apache-2.0

use bijux_probe_query::{parse_query_pairs, parse_query_spec, parse_view};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parser_never_panics_under_random_inputs(raw in ".*") {
        let _ = parse_query_spec(&raw);
    }

    #[test]
    fn parser_is_total_over_query_strings(
        sort in "[a-zA-Z:, ]{0,24}",
        filter in "[a-zA-Z0-9:,. ]{0,32}",
        view in "[a-z(),]{0,24}",
        page in ".{0,4}",
    ) {
        let spec = parse_query_pairs(vec![
            ("sort".to_string(), sort),
            ("filter".to_string(), filter),
            ("view".to_string(), view),
            ("page".to_string(), page),
        ]);
        prop_assert!(spec.page >= 1);
        prop_assert!(spec.page_size >= 1);
        prop_assert!(spec.sort.iter().all(|s| !s.field.trim().is_empty()));
        prop_assert!(spec.filter.keys().all(|f| !f.trim().is_empty()));
    }

    #[test]
    fn view_never_keeps_empty_groups(raw in "[a-z(), ]{0,40}") {
        for (entity, fields) in parse_view(&raw) {
            prop_assert!(!entity.is_empty());
            prop_assert!(!fields.is_empty());
            prop_assert!(fields.iter().all(|f| !f.is_empty()));
        }
    }

    #[test]
    fn rooted_paths_always_parse(path in "(/[a-zA-Z]{1,6}){0,3}", query in "[a-zA-Z0-9=&:,]{0,24}") {
        let raw = format!("{path}?{query}");
        prop_assert!(parse_query_spec(&raw).is_ok());
    }
}

use bijux_probe_corpus::{CaseSource, Corpus};
use bijux_probe_verify::{verify_test_case, VerifyOptions};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn descending_sort_scenario_fails_on_the_inverted_pair() {
    let corpus = Corpus::from_json_str(
        &json!({
            "/api/User?sort=age:desc": {
                "status": 200,
                "response": {"data": [{"age": 30}, {"age": 25}, {"age": 40}], "status": "200"}
            }
        })
        .to_string(),
    )
    .expect("corpus");
    let case = corpus.load(1).expect("case");
    assert_eq!(case.expected_status(), 200);
    assert_eq!(case.actual_status(), 200);

    let result = verify_test_case(&case, &VerifyOptions::default());
    assert!(!result.passed());
    assert_eq!(result.ordinal(), Some(1));
    assert_eq!(result.issues().len(), 1);
    assert!(result.issues()[0].contains("25,40"));
}

#[test]
fn every_case_in_a_mixed_corpus_verifies_independently() {
    let corpus = Corpus::from_json_str(
        r#"{
            "/api/User?sort=lastName": {
                "status": 200,
                "response": {"data": [{"lastName": "Adams"}, {"lastName": "Baker"}], "status": "200"}
            },
            "/api/User/404": {"status": 404, "response": "Not Found"},
            "/api/Team?filter=size:gt:3&view=Owner(name)": {
                "status": 200,
                "response": {"data": [{"size": 2, "Owner": {"name": "Kim"}}], "status": "200"}
            }
        }"#,
    )
    .expect("corpus");
    assert_eq!(corpus.key(1).expect("first key"), "/api/User?sort=lastName");
    assert_eq!(
        corpus.key(3).expect("last key"),
        "/api/Team?filter=size:gt:3&view=Owner(name)"
    );
    let verdicts: Vec<bool> = (1..=corpus.count().expect("count"))
        .map(|ordinal| {
            let case = corpus.load(ordinal).expect("case");
            verify_test_case(&case, &VerifyOptions::default()).passed()
        })
        .collect();
    assert_eq!(verdicts, vec![true, true, false]);
}

fn sort_case(values: &[i64], direction: &str) -> bijux_probe_corpus::TestCase {
    let data: Vec<_> = values.iter().map(|v| json!({"n": v})).collect();
    let corpus = Corpus::from_json_str(
        &json!({
            format!("/api/N?sort=n:{direction}"): {"status": 200, "response": {"data": data}}
        })
        .to_string(),
    )
    .expect("corpus");
    corpus.load(1).expect("case")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn sorted_sequences_always_pass(mut values in proptest::collection::vec(-1000i64..1000, 0..24)) {
        values.sort_unstable();
        let ascending = verify_test_case(&sort_case(&values, "asc"), &VerifyOptions::default());
        prop_assert!(ascending.passed(), "{:?}", ascending.issues());
        values.reverse();
        let descending = verify_test_case(&sort_case(&values, "desc"), &VerifyOptions::default());
        prop_assert!(descending.passed(), "{:?}", descending.issues());
    }

    #[test]
    fn sort_issues_match_strict_inversions(values in proptest::collection::vec(-50i64..50, 0..24)) {
        let inversions = values.windows(2).filter(|pair| pair[0] > pair[1]).count();
        let result = verify_test_case(&sort_case(&values, "asc"), &VerifyOptions::default());
        prop_assert_eq!(result.issues().len(), inversions);
    }
}

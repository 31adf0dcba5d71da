// SPDX-License-Identifier: Apache-2.0

use bijux_probe_core::ProbeConfig;
use bijux_probe_verify::{
    check_pagination, check_past_last_page, CheckName, CheckParams, CheckRegistry,
    FakeTransport, PaginationError, TransportError,
};
use serde_json::{json, Value};

const BASE: &str = "http://probe.test";

fn config() -> ProbeConfig {
    ProbeConfig::new(BASE).expect("config")
}

fn page_url(page: u64, page_size: u64) -> String {
    format!("{BASE}/api/User?page={page}&pageSize={page_size}")
}

fn page_body(ids: &[Value], total_pages: u64, total: u64) -> String {
    let data: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
    json!({
        "data": data,
        "status": "200",
        "pagination": {"totalPages": total_pages, "totalRecords": total}
    })
    .to_string()
}

/// Serves `ids` split into pages of `page_size`.
fn paged_server(ids: &[Value], page_size: u64) -> FakeTransport {
    let chunks: Vec<&[Value]> = ids.chunks(page_size as usize).collect();
    let total_pages = chunks.len().max(1) as u64;
    let mut transport = FakeTransport::default();
    for page in 1..=total_pages + 1 {
        let chunk = chunks.get(page as usize - 1).copied().unwrap_or(&[]);
        transport = transport.with_response(
            "GET",
            &page_url(page, page_size),
            200,
            &page_body(chunk, total_pages, ids.len() as u64),
        );
    }
    transport
}

fn sequential_ids(count: i64) -> Vec<Value> {
    (1..=count).map(|id| json!(id)).collect()
}

#[test]
fn consistent_collection_passes_and_fetches_every_page() {
    let transport = paged_server(&sequential_ids(20), 8);
    let result = check_pagination(&transport, &config(), "User", 20, 8).expect("check");
    assert!(result.passed(), "{:?}", result.issues());
    assert_eq!(transport.sent().len(), 3);
}

#[test]
fn rerunning_against_unchanged_data_yields_identical_issues() {
    let mut ids = sequential_ids(17);
    ids.insert(9, json!(4));
    let transport = paged_server(&ids, 8);
    let first = check_pagination(&transport, &config(), "User", 20, 8).expect("first run");
    let second = check_pagination(&transport, &config(), "User", 20, 8).expect("second run");
    assert!(!first.passed());
    assert_eq!(first.issues(), second.issues());
}

#[test]
fn every_defect_is_reported_in_one_pass() {
    let ids = vec![json!(1), json!(2), json!(2), json!(3), json!(1)];
    let transport = paged_server(&ids, 2);
    let result = check_pagination(&transport, &config(), "User", 8, 2).expect("check");
    assert_eq!(
        result.issues(),
        [
            "total pages: server reported 3, expected 4",
            "record count: fetched 5, expected 8",
            "duplicate ID: 2",
            "duplicate ID: 1",
        ]
    );
}

#[test]
fn out_of_order_ids_across_pages_are_reported() {
    let ids = vec![json!(1), json!(2), json!(10), json!(3)];
    let transport = paged_server(&ids, 2);
    let result = check_pagination(&transport, &config(), "User", 4, 2).expect("check");
    assert_eq!(result.issues(), ["out of order ID: 3 after 10"]);
}

#[test]
fn failed_page_fetch_aborts_the_check() {
    let transport = FakeTransport::default()
        .with_response("GET", &page_url(1, 2), 200, &page_body(&sequential_ids(2), 2, 4))
        .with_error(
            "GET",
            &page_url(2, 2),
            TransportError::Timeout {
                url: page_url(2, 2),
            },
        );
    let err = check_pagination(&transport, &config(), "User", 4, 2).expect_err("timeout");
    assert!(matches!(
        err,
        PaginationError::Fetch {
            page: 2,
            source: TransportError::Timeout { .. }
        }
    ));
}

#[test]
fn envelope_without_total_pages_is_malformed() {
    let transport = FakeTransport::default().with_response(
        "GET",
        &page_url(1, 5),
        200,
        r#"{"data": [{"id": 1}]}"#,
    );
    let err = check_pagination(&transport, &config(), "User", 1, 5).expect_err("malformed");
    assert!(matches!(err, PaginationError::MalformedEnvelope { page: 1, .. }));
}

#[test]
fn zero_page_size_is_rejected() {
    let transport = FakeTransport::default();
    let err = check_pagination(&transport, &config(), "User", 1, 0).expect_err("page size");
    assert_eq!(err, PaginationError::InvalidPageSize);
}

#[test]
fn page_past_the_end_must_be_empty() {
    let transport = paged_server(&sequential_ids(6), 4);
    let result = check_past_last_page(&transport, &config(), "User", 4).expect("check");
    assert!(result.passed(), "{:?}", result.issues());

    let leaky = FakeTransport::default()
        .with_response("GET", &page_url(1, 4), 200, &page_body(&sequential_ids(4), 1, 4))
        .with_response("GET", &page_url(2, 4), 200, &page_body(&sequential_ids(4), 1, 4));
    let result = check_past_last_page(&leaky, &config(), "User", 4).expect("check");
    assert_eq!(result.issues(), ["page 2 past the last page returned 4 record(s)"]);
}

#[test]
fn registry_runs_checks_by_name() {
    let registry = CheckRegistry::builtin();
    let name = registry.resolve("pagination").expect("known check");
    assert_eq!(name, CheckName::Pagination);
    let transport = paged_server(&sequential_ids(5), 2);
    let params = CheckParams {
        entity: "User".to_string(),
        page_size: 2,
        expected_total: 5,
    };
    let result = name.run(&transport, &config(), &params).expect("check");
    assert!(result.passed(), "{:?}", result.issues());
}

// SPDX-License-Identifier: Apache-2.0

use crate::extract::{extract_fields, FieldExtraction};
use crate::result::VerificationResult;
use bijux_probe_core::json::{
    as_bool_lenient, as_f64_lenient, compare_values, is_blank, render_scalar,
};
use bijux_probe_core::ProbeConfig;
use bijux_probe_corpus::TestCase;
use bijux_probe_query::{FilterOperator, Scalar, SortDirection, SortField};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::debug;

const PLACEHOLDER_PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// String ordering and equality honour case when set.
    pub case_sensitive: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

impl VerifyOptions {
    #[must_use]
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            case_sensitive: config.case_sensitive,
        }
    }
}

/// Extracts the fields named by the case's query and verifies them.
#[must_use]
pub fn verify_test_case(case: &TestCase, options: &VerifyOptions) -> VerificationResult {
    let extraction = extract_fields(case.spec(), case.data());
    verify_case(case, &extraction, options)
}

/// Runs every check implied by the case and collects all violations.
#[must_use]
pub fn verify_case(
    case: &TestCase,
    extraction: &FieldExtraction,
    options: &VerifyOptions,
) -> VerificationResult {
    let mut result = VerificationResult::new(Some(case.ordinal()), case.key());
    check_status(case, &mut result);
    if case.is_placeholder_body() {
        let shown = preview(case.raw_body(), PLACEHOLDER_PREVIEW_CHARS);
        if (200..300).contains(&case.actual_status()) {
            result.issue(format!("response body is not JSON: {shown}"));
        } else {
            result.note(format!("response body is a placeholder: {shown}"));
        }
    }
    if case.has_notifications() {
        result.note("response carries notifications");
    }
    check_sort(case, extraction, options, &mut result);
    check_filter(case, extraction, options, &mut result);
    check_view(case, extraction, &mut result);
    debug!(
        ordinal = case.ordinal(),
        key = case.key(),
        issues = result.issues().len(),
        "verified case"
    );
    result
}

fn check_status(case: &TestCase, result: &mut VerificationResult) {
    if case.expected_status() != case.actual_status() {
        result.issue(format!(
            "status: expected {}, got {}",
            case.expected_status(),
            case.actual_status()
        ));
    }
}

fn check_sort(
    case: &TestCase,
    extraction: &FieldExtraction,
    options: &VerifyOptions,
    result: &mut VerificationResult,
) {
    let sort = &case.spec().sort;
    if sort.is_empty() {
        return;
    }
    if case.data().is_empty() {
        result.note("no records returned, sort check skipped");
        return;
    }
    for field in sort {
        check_sort_field(field, extraction.sort(&field.field), options, result);
    }
}

// Each declared key, duplicates included, must be monotonic over the whole
// extracted sequence.
fn check_sort_field(
    field: &SortField,
    values: &[Value],
    options: &VerifyOptions,
    result: &mut VerificationResult,
) {
    if values.is_empty() {
        result.note(format!("sort field `{}` absent from every record", field.field));
        return;
    }
    let mut incomparable = 0usize;
    for (idx, pair) in values.windows(2).enumerate() {
        match compare_values(&pair[0], &pair[1], options.case_sensitive) {
            Some(ordering) if is_inversion(ordering, field.direction) => {
                result.issue(format!(
                    "sort {} {}: {},{} out of order at position {}",
                    field.field,
                    field.direction,
                    render_scalar(&pair[0]),
                    render_scalar(&pair[1]),
                    idx + 1
                ));
            }
            Some(_) => {}
            None => incomparable += 1,
        }
    }
    note_incomparable(result, &field.field, incomparable);
}

fn is_inversion(ordering: Ordering, direction: SortDirection) -> bool {
    match direction {
        SortDirection::Asc => ordering == Ordering::Greater,
        SortDirection::Desc => ordering == Ordering::Less,
    }
}

fn note_incomparable(result: &mut VerificationResult, field: &str, count: usize) {
    if count > 0 {
        result.note(format!(
            "sort {field}: {count} incomparable pair(s) skipped"
        ));
    }
}

fn check_filter(
    case: &TestCase,
    extraction: &FieldExtraction,
    options: &VerifyOptions,
    result: &mut VerificationResult,
) {
    let filter = &case.spec().filter;
    if filter.is_empty() {
        return;
    }
    let empty = case.data().is_empty();
    if empty {
        result.note("no records returned, filter check skipped");
    }
    for (field, predicate) in filter {
        let Some(operator) = predicate.operator_kind() else {
            result.issue(format!(
                "filter {field}: unsupported filter operator `{}`",
                predicate.operator
            ));
            continue;
        };
        if empty {
            continue;
        }
        if operator.is_numeric() && predicate.value.as_f64().is_none() {
            result.issue(format!(
                "filter {field} {} {}: bound is not numerically comparable, check skipped",
                predicate.operator, predicate.value
            ));
            continue;
        }
        let values = extraction.filter(field);
        if values.is_empty() {
            result.note(format!("filter field `{field}` absent from every record"));
            continue;
        }
        for (idx, value) in values.iter().enumerate() {
            let outcome = match evaluate(operator, value, &predicate.value, options) {
                Some(true) => continue,
                Some(false) => "does not match",
                None => "is not numerically comparable",
            };
            result.issue(format!(
                "filter {field} {} {}: value {} at position {} {outcome}",
                predicate.operator,
                predicate.value,
                render_scalar(value),
                idx + 1
            ));
        }
    }
}

fn evaluate(
    operator: FilterOperator,
    value: &Value,
    expected: &Scalar,
    options: &VerifyOptions,
) -> Option<bool> {
    match operator {
        FilterOperator::Eq => Some(scalar_matches(value, expected, options.case_sensitive)),
        FilterOperator::Ne => Some(!scalar_matches(value, expected, options.case_sensitive)),
        FilterOperator::Like => {
            let haystack = render_scalar(value);
            let needle = expected.to_string();
            Some(if options.case_sensitive {
                haystack.contains(&needle)
            } else {
                haystack.to_lowercase().contains(&needle.to_lowercase())
            })
        }
        FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte => {
            let actual = as_f64_lenient(value)?;
            let bound = expected.as_f64()?;
            Some(match operator {
                FilterOperator::Gt => actual > bound,
                FilterOperator::Gte => actual >= bound,
                FilterOperator::Lt => actual < bound,
                _ => actual <= bound,
            })
        }
    }
}

fn scalar_matches(value: &Value, expected: &Scalar, case_sensitive: bool) -> bool {
    match expected {
        Scalar::Integer(n) => match value.as_i64() {
            Some(actual) => actual == *n,
            None => as_f64_lenient(value) == Some(*n as f64),
        },
        Scalar::Float(f) => as_f64_lenient(value) == Some(*f),
        Scalar::Boolean(b) => as_bool_lenient(value) == Some(*b),
        Scalar::Text(text) => {
            let actual = render_scalar(value);
            if case_sensitive {
                actual == *text
            } else {
                actual.to_lowercase() == text.to_lowercase()
            }
        }
    }
}

fn check_view(case: &TestCase, extraction: &FieldExtraction, result: &mut VerificationResult) {
    let spec = case.spec();
    if spec.view.is_empty() {
        return;
    }
    if case.data().is_empty() {
        result.note("no records returned, view check skipped");
        return;
    }
    for (entity, field) in spec.view_pairs() {
        if extraction.view(entity, field).iter().all(is_blank) {
            result.issue(format!("view field `{entity}.{field}` missing from every record"));
        }
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(max_chars).collect();
    format!("{head}...")
}

// SPDX-License-Identifier: Apache-2.0

//! Whole-collection pagination consistency checks.
//!
//! Pages are fetched one at a time, in order, through the transport port.
//! Arithmetic, uniqueness and ordering findings become issues on the result;
//! only a failed fetch or an envelope without paging metadata aborts the check.

use crate::ports::{HttpRequest, HttpTransport, TransportError};
use crate::result::VerificationResult;
use bijux_probe_core::json::render_scalar;
use bijux_probe_core::{ConfigError, ProbeConfig};
use bijux_probe_corpus::ResponseEnvelope;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    InvalidPageSize,
    Config(ConfigError),
    Fetch { page: u64, source: TransportError },
    MalformedEnvelope { page: u64, detail: String },
}

impl fmt::Display for PaginationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPageSize => f.write_str("page size must be greater than zero"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Fetch { page, source } => write!(f, "fetching page {page} failed: {source}"),
            Self::MalformedEnvelope { page, detail } => {
                write!(f, "page {page} has a malformed envelope: {detail}")
            }
        }
    }
}

impl std::error::Error for PaginationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Fetch { source, .. } => Some(source),
            Self::InvalidPageSize | Self::MalformedEnvelope { .. } => None,
        }
    }
}

/// Walks `/api/<entity>` page by page and checks page count, record count,
/// id uniqueness and id ordering against `expected_total`.
pub fn check_pagination(
    transport: &dyn HttpTransport,
    config: &ProbeConfig,
    entity: &str,
    expected_total: u64,
    page_size: u64,
) -> Result<VerificationResult, PaginationError> {
    if page_size == 0 {
        return Err(PaginationError::InvalidPageSize);
    }
    let expected_pages = expected_total.div_ceil(page_size);
    let mut result = VerificationResult::new(None, format!("pagination /api/{entity}"));
    let mut ids: Vec<Value> = Vec::new();
    let mut fetched = 0u64;
    let mut page = 1u64;

    let reported_pages = loop {
        let envelope = fetch_page(transport, config, entity, page, page_size)?;
        let reported = envelope
            .total_pages()
            .ok_or_else(|| PaginationError::MalformedEnvelope {
                page,
                detail: "missing pagination.totalPages".to_string(),
            })?;
        let records = envelope.records();
        fetched += records.len() as u64;
        for (idx, record) in records.iter().enumerate() {
            match record.get("id") {
                Some(id) if !id.is_null() => ids.push(id.clone()),
                _ => result.note(format!("record {} on page {page} has no id", idx + 1)),
            }
        }
        debug!(page, records = records.len(), reported, "fetched page");
        if page >= reported {
            break reported;
        }
        if page >= config.max_pages {
            result.issue(format!(
                "stopped after {page} pages; server still reports {reported}"
            ));
            break reported;
        }
        page += 1;
    };

    result.extend_issues(audit_pages(
        reported_pages,
        expected_pages,
        fetched,
        expected_total,
    ));
    result.extend_issues(audit_ids(&ids));
    info!(
        entity,
        pages = page,
        records = fetched,
        issues = result.issues().len(),
        "pagination check finished"
    );
    Ok(result)
}

/// Requests the page just past the last one and expects no records.
pub fn check_past_last_page(
    transport: &dyn HttpTransport,
    config: &ProbeConfig,
    entity: &str,
    page_size: u64,
) -> Result<VerificationResult, PaginationError> {
    if page_size == 0 {
        return Err(PaginationError::InvalidPageSize);
    }
    let mut result = VerificationResult::new(None, format!("past-last-page /api/{entity}"));
    let first = fetch_page(transport, config, entity, 1, page_size)?;
    let last = first
        .total_pages()
        .ok_or_else(|| PaginationError::MalformedEnvelope {
            page: 1,
            detail: "missing pagination.totalPages".to_string(),
        })?;
    let beyond = last + 1;
    match fetch_page(transport, config, entity, beyond, page_size) {
        Ok(envelope) => {
            let count = envelope.records().len();
            if count > 0 {
                result.issue(format!(
                    "page {beyond} past the last page returned {count} record(s)"
                ));
            }
        }
        Err(PaginationError::Fetch {
            source: TransportError::Status { status, .. },
            ..
        }) => {
            result.issue(format!(
                "page {beyond} past the last page answered status {status}"
            ));
        }
        Err(err) => return Err(err),
    }
    Ok(result)
}

/// Page-count and record-count arithmetic.
#[must_use]
pub fn audit_pages(
    reported_pages: u64,
    expected_pages: u64,
    fetched_records: u64,
    expected_total: u64,
) -> Vec<String> {
    let mut issues = Vec::new();
    if reported_pages != expected_pages {
        issues.push(format!(
            "total pages: server reported {reported_pages}, expected {expected_pages}"
        ));
    }
    if fetched_records != expected_total {
        issues.push(format!(
            "record count: fetched {fetched_records}, expected {expected_total}"
        ));
    }
    issues
}

/// One pass over ids in fetch order. A repeated id is a duplicate and is not
/// also reported as out of order.
#[must_use]
pub fn audit_ids(ids: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut previous: Option<&Value> = None;
    for id in ids {
        if !seen.insert(id.to_string()) {
            issues.push(format!("duplicate ID: {}", render_scalar(id)));
        } else if let Some(prev) = previous {
            if id_order(prev, id) != Ordering::Less {
                issues.push(format!(
                    "out of order ID: {} after {}",
                    render_scalar(id),
                    render_scalar(prev)
                ));
            }
        }
        previous = Some(id);
    }
    issues
}

// Numbers compare numerically, strings lexically, numbers sort before strings.
fn id_order(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = a.as_f64().unwrap_or(f64::NAN);
                let y = b.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        (a, b) => render_scalar(a).cmp(&render_scalar(b)),
    }
}

fn fetch_page(
    transport: &dyn HttpTransport,
    config: &ProbeConfig,
    entity: &str,
    page: u64,
    page_size: u64,
) -> Result<ResponseEnvelope, PaginationError> {
    let url = config
        .page_url(entity, page, page_size)
        .map_err(PaginationError::Config)?;
    let url_text = url.to_string();
    let response = transport
        .send(&HttpRequest::get(url))
        .map_err(|source| PaginationError::Fetch { page, source })?;
    if !response.is_success() {
        return Err(PaginationError::Fetch {
            page,
            source: TransportError::Status {
                url: url_text,
                status: response.status,
            },
        });
    }
    ResponseEnvelope::parse_body(&response.body).map_err(|e| PaginationError::Fetch {
        page,
        source: TransportError::Decode {
            url: url_text,
            detail: e.to_string(),
        },
    })
}

// SPDX-License-Identifier: Apache-2.0

use crate::definition::{CaseDefinition, Record, RecordedResponse};
use crate::error::{CorpusError, CorpusErrorCode};
use bijux_probe_query::{parse_query_spec, QuerySpec};
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;
/// Status assumed for a placeholder body whose case does not record an error status.
pub const PLACEHOLDER_STATUS: u16 = 500;

/// A materialized corpus entry. Read-only once built; a replay produces a new
/// value through [`TestCase::with_response`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    ordinal: usize,
    key: String,
    method: String,
    description: String,
    request_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_body: Option<Value>,
    expected_status: u16,
    spec: QuerySpec,
    actual_status: u16,
    data: Vec<Record>,
    notifications: Value,
    #[serde(skip)]
    pagination: Value,
    placeholder_body: bool,
    #[serde(skip)]
    raw_body: String,
}

impl TestCase {
    /// Builds the case for `ordinal`, parsing `key` as the request URL.
    pub fn from_definition(
        ordinal: usize,
        key: &str,
        definition: &CaseDefinition,
    ) -> Result<Self, CorpusError> {
        let spec = parse_query_spec(key).map_err(|e| {
            CorpusError::new(CorpusErrorCode::InvalidKey, format!("ordinal {ordinal}: {e}"))
        })?;
        let expected_status = definition.status.unwrap_or(DEFAULT_EXPECTED_STATUS);
        let response = RecordedResponse::from_value(definition.response.as_ref());
        let raw_body = match (&definition.response, &response) {
            (_, RecordedResponse::Placeholder(text)) => text.clone(),
            (Some(value), RecordedResponse::Envelope(_)) => value.to_string(),
            (None, RecordedResponse::Envelope(_)) => String::new(),
        };
        let case = Self {
            ordinal,
            key: key.to_string(),
            method: definition
                .method
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map_or_else(|| DEFAULT_METHOD.to_string(), str::to_ascii_uppercase),
            description: definition.description.clone().unwrap_or_default(),
            request_url: definition
                .url
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| key.to_string()),
            request_body: definition.body.clone(),
            expected_status,
            spec,
            actual_status: expected_status,
            data: Vec::new(),
            notifications: Value::Null,
            pagination: Value::Null,
            placeholder_body: false,
            raw_body: String::new(),
        };
        Ok(case.apply_response(None, response, raw_body))
    }

    /// Same case with the outcome of a live request in place of the recording.
    #[must_use]
    pub fn with_response(self, actual_status: u16, body: &str) -> Self {
        let response = RecordedResponse::from_body(body);
        self.apply_response(Some(actual_status), response, body.to_string())
    }

    fn apply_response(
        mut self,
        transport_status: Option<u16>,
        response: RecordedResponse,
        raw_body: String,
    ) -> Self {
        match response {
            RecordedResponse::Envelope(envelope) => {
                self.actual_status = transport_status
                    .or_else(|| envelope.status_code())
                    .unwrap_or(self.expected_status);
                self.data = envelope.records();
                self.notifications = envelope.notifications;
                self.pagination = envelope.pagination;
                self.placeholder_body = false;
            }
            RecordedResponse::Placeholder(_) => {
                self.actual_status = transport_status.unwrap_or(if self.expected_status >= 400 {
                    self.expected_status
                } else {
                    PLACEHOLDER_STATUS
                });
                self.data = Vec::new();
                self.notifications = Value::Null;
                self.pagination = Value::Null;
                self.placeholder_body = true;
            }
        }
        self.raw_body = raw_body;
        self
    }

    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Target to replay: the recorded `url` when present, else the key.
    #[must_use]
    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    #[must_use]
    pub fn request_body(&self) -> Option<&Value> {
        self.request_body.as_ref()
    }

    #[must_use]
    pub fn expected_status(&self) -> u16 {
        self.expected_status
    }

    #[must_use]
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    #[must_use]
    pub fn actual_status(&self) -> u16 {
        self.actual_status
    }

    #[must_use]
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Warnings/errors grouped by entity type and instance id. Not interpreted.
    #[must_use]
    pub fn notifications(&self) -> &Value {
        &self.notifications
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !is_empty_tree(&self.notifications)
    }

    #[must_use]
    pub fn pagination(&self) -> &Value {
        &self.pagination
    }

    #[must_use]
    pub fn is_placeholder_body(&self) -> bool {
        self.placeholder_body
    }

    #[must_use]
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }
}

fn is_empty_tree(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(value: Value) -> CaseDefinition {
        serde_json::from_value(value).expect("definition")
    }

    #[test]
    fn envelope_case_reads_status_data_and_spec() {
        let case = TestCase::from_definition(
            1,
            "/api/User?sort=age:desc",
            &definition(json!({
                "status": 200,
                "response": {"data": [{"age": 30}, {"age": 25}], "status": "200"}
            })),
        )
        .expect("case");
        assert_eq!(case.method(), "GET");
        assert_eq!(case.expected_status(), 200);
        assert_eq!(case.actual_status(), 200);
        assert_eq!(case.data().len(), 2);
        assert_eq!(case.spec().sort[0].field, "age");
        assert!(!case.has_notifications());
        assert!(case.raw_body().contains("\"age\":30"));
    }

    #[test]
    fn placeholder_body_takes_recorded_error_status() {
        let case = TestCase::from_definition(
            2,
            "/api/User/999",
            &definition(json!({"status": 404, "method": "get", "response": "Not Found"})),
        )
        .expect("case");
        assert_eq!(case.method(), "GET");
        assert_eq!(case.actual_status(), 404);
        assert!(case.data().is_empty());
        assert!(case.is_placeholder_body());
        assert_eq!(case.raw_body(), "Not Found");

        let unexpected = TestCase::from_definition(
            3,
            "/api/User",
            &definition(json!({"response": "boom"})),
        )
        .expect("case");
        assert_eq!(unexpected.expected_status(), 200);
        assert_eq!(unexpected.actual_status(), PLACEHOLDER_STATUS);
    }

    #[test]
    fn live_response_replaces_recording() {
        let case = TestCase::from_definition(
            1,
            "/api/User",
            &definition(json!({"status": 200, "response": {"data": [{"id": 1}]}})),
        )
        .expect("case");
        let body = json!({
            "data": {"id": 9},
            "notifications": {"User": {"9": ["stale"]}}
        })
        .to_string();
        let live = case.with_response(200, &body);
        assert_eq!(live.data().len(), 1);
        assert_eq!(live.data()[0]["id"], json!(9));
        assert!(live.has_notifications());

        let broken = live.with_response(502, "Bad Gateway");
        assert_eq!(broken.actual_status(), 502);
        assert!(broken.is_placeholder_body());
    }

    #[test]
    fn recorded_url_overrides_key_for_replay() {
        let case = TestCase::from_definition(
            1,
            "create user",
            &definition(json!({"url": "/api/User", "method": "post", "body": {"name": "Jo"}})),
        )
        .expect("case");
        assert_eq!(case.request_url(), "/api/User");
        assert_eq!(case.method(), "POST");
        assert_eq!(case.request_body(), Some(&json!({"name": "Jo"})));
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// One record of a response `data` array.
pub type Record = Map<String, Value>;

/// A corpus entry as written in the corpus file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CaseDefinition {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub response: Option<Value>,
}

/// The standard `{data, notifications, status, pagination}` API envelope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub notifications: Value,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub pagination: Value,
}

impl ResponseEnvelope {
    pub fn parse_body(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// `data` as a record sequence: arrays keep their object items, a single
    /// object becomes a one-element sequence, null becomes empty.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        match &self.data {
            Value::Null => Vec::new(),
            Value::Object(map) => vec![map.clone()],
            Value::Array(items) => items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| match item {
                    Value::Object(map) => Some(map.clone()),
                    other => {
                        warn!(index = idx, kind = json_kind(other), "skipping non-object record");
                        None
                    }
                })
                .collect(),
            other => {
                warn!(kind = json_kind(other), "response data is not a record collection");
                Vec::new()
            }
        }
    }

    /// Status carried inside the envelope, as a string (`"200"`) or a number.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match &self.status {
            Value::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
            Value::String(s) => s.trim().parse::<u16>().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn total_pages(&self) -> Option<u64> {
        self.pagination.get("totalPages").and_then(lenient_count)
    }

    #[must_use]
    pub fn total_records(&self) -> Option<u64> {
        ["totalRecords", "total"]
            .iter()
            .find_map(|key| self.pagination.get(*key).and_then(lenient_count))
    }
}

/// Recorded response body in one of the two shapes a corpus may hold.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedResponse {
    Envelope(ResponseEnvelope),
    /// Bare string body standing in for an error response.
    Placeholder(String),
}

impl RecordedResponse {
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Envelope(ResponseEnvelope::default()),
            Some(Value::String(text)) => Self::Placeholder(text.clone()),
            Some(Value::Array(items)) => Self::Envelope(ResponseEnvelope {
                data: Value::Array(items.clone()),
                ..ResponseEnvelope::default()
            }),
            Some(object @ Value::Object(_)) => {
                match serde_json::from_value::<ResponseEnvelope>(object.clone()) {
                    Ok(envelope) => Self::Envelope(envelope),
                    Err(err) => {
                        warn!(error = %err, "recorded response is not an envelope");
                        Self::Placeholder(object.to_string())
                    }
                }
            }
            Some(other) => Self::Placeholder(other.to_string()),
        }
    }

    /// Parses a live response body. Non-JSON bodies become placeholders.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(Some(&value)),
            Err(_) => Self::Placeholder(body.to_string()),
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

fn lenient_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                .map(|v| v as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

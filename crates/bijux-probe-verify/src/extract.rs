//! Pulls the fields a query names out of response records.

use bijux_probe_corpus::Record;
use bijux_probe_query::QuerySpec;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-field value lists in record order. A record lacking the field
/// contributes nothing, so a list may be shorter than the record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldExtraction {
    pub sort_values: BTreeMap<String, Vec<Value>>,
    pub filter_values: BTreeMap<String, Vec<Value>>,
    /// Keyed `entity.field`. Only non-empty lists are kept.
    pub view_values: BTreeMap<String, Vec<Value>>,
}

impl FieldExtraction {
    #[must_use]
    pub fn sort(&self, field: &str) -> &[Value] {
        self.sort_values.get(field).map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn filter(&self, field: &str) -> &[Value] {
        self.filter_values.get(field).map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn view(&self, entity: &str, field: &str) -> &[Value] {
        self.view_values
            .get(&view_key(entity, field))
            .map_or(&[][..], Vec::as_slice)
    }
}

#[must_use]
pub fn view_key(entity: &str, field: &str) -> String {
    format!("{entity}.{field}")
}

#[must_use]
pub fn extract_fields(spec: &QuerySpec, data: &[Record]) -> FieldExtraction {
    let mut extraction = FieldExtraction::default();
    for sort in &spec.sort {
        extraction
            .sort_values
            .entry(sort.field.clone())
            .or_insert_with(|| collect_field(data, &sort.field));
    }
    for field in spec.filter.keys() {
        extraction
            .filter_values
            .insert(field.clone(), collect_field(data, field));
    }
    for (entity, field) in spec.view_pairs() {
        let values = collect_view(data, entity, field);
        if !values.is_empty() {
            extraction.view_values.insert(view_key(entity, field), values);
        }
    }
    extraction
}

fn collect_field(data: &[Record], field: &str) -> Vec<Value> {
    data.iter()
        .filter_map(|record| record.get(field).cloned())
        .collect()
}

// Embedded `record[entity][field]` values first, then flattened
// `record["entity.field"]` values. Both passes contribute.
fn collect_view(data: &[Record], entity: &str, field: &str) -> Vec<Value> {
    let embedded = data
        .iter()
        .filter_map(|record| record.get(entity))
        .flat_map(|related| embedded_values(related, field));
    let flat_key = view_key(entity, field);
    let flattened = data
        .iter()
        .filter_map(|record| record.get(&flat_key).cloned());
    embedded.chain(flattened).collect()
}

// A related entity may be embedded as one object or as a list of objects.
fn embedded_values(related: &Value, field: &str) -> Vec<Value> {
    match related {
        Value::Object(map) => map.get(field).cloned().into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().and_then(|map| map.get(field)).cloned())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bijux_probe_query::parse_query_spec;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).expect("records")
    }

    #[test]
    fn absent_fields_contribute_nothing() {
        let spec = parse_query_spec("/api/User?sort=age&filter=name:Jo").expect("spec");
        let data = records(json!([{"age": 3, "name": "Jo"}, {"name": "Jo"}, {"age": 1}]));
        let extraction = extract_fields(&spec, &data);
        assert_eq!(extraction.sort("age"), &[json!(3), json!(1)]);
        assert_eq!(extraction.filter("name"), &[json!("Jo"), json!("Jo")]);
    }

    #[test]
    fn view_reads_embedded_then_flattened_values() {
        let spec = parse_query_spec("/api/User?view=Team(name)").expect("spec");
        let data = records(json!([
            {"Team.name": "flat-a", "Team": {"name": "nested-a"}},
            {"Team": [{"name": "nested-b"}, {"id": 4}]},
            {"Team.name": "flat-c"}
        ]));
        let extraction = extract_fields(&spec, &data);
        assert_eq!(
            extraction.view("Team", "name"),
            &[json!("nested-a"), json!("nested-b"), json!("flat-a"), json!("flat-c")]
        );
    }

    #[test]
    fn empty_view_lists_are_dropped() {
        let spec = parse_query_spec("/api/User?view=Team(name,code)").expect("spec");
        let data = records(json!([{"Team": {"name": "x"}}]));
        let extraction = extract_fields(&spec, &data);
        assert!(extraction.view_values.contains_key("Team.name"));
        assert!(!extraction.view_values.contains_key("Team.code"));
    }
}

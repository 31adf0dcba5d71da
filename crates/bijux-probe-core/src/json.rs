//! Accessors and coercions over loosely shaped JSON response trees.
//!
//! Response bodies are kept as [`serde_json::Value`]; these helpers give the
//! verification code type-aware comparisons without ad hoc matching at every
//! call site.

use serde_json::Value;
use std::cmp::Ordering;

#[must_use]
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Numeric view of a value. Numeric strings are accepted after trimming.
#[must_use]
pub fn as_f64_lenient(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Boolean view of a value. Accepts JSON booleans and the literal strings
/// `true` / `false`.
#[must_use]
pub fn as_bool_lenient(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse::<bool>().ok(),
        _ => None,
    }
}

/// `true` for null, empty or whitespace-only strings, and empty containers.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Human-facing rendering: strings unquoted, everything else as compact JSON.
#[must_use]
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Type-aware ordering. Numbers compare numerically, strings lexically
/// (optionally ignoring case), booleans false < true. Mixed types, nulls and
/// containers are incomparable.
#[must_use]
pub fn compare_values(left: &Value, right: &Value, case_sensitive: bool) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                return Some(x.cmp(&y));
            }
            if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
                return Some(x.cmp(&y));
            }
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        (Value::String(a), Value::String(b)) => Some(if case_sensitive {
            a.cmp(b)
        } else {
            a.to_lowercase().cmp(&b.to_lowercase())
        }),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_numerically_across_representations() {
        assert_eq!(compare_values(&json!(9), &json!(10), true), Some(Ordering::Less));
        assert_eq!(compare_values(&json!(2.5), &json!(2), true), Some(Ordering::Greater));
        assert_eq!(
            compare_values(&json!(u64::MAX), &json!(u64::MAX - 1), true),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn strings_honor_case_sensitivity_flag() {
        assert_eq!(compare_values(&json!("b"), &json!("B"), true), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!("b"), &json!("B"), false), Some(Ordering::Equal));
        assert_eq!(compare_values(&json!("10"), &json!("9"), true), Some(Ordering::Less));
    }

    #[test]
    fn mixed_types_are_incomparable() {
        assert_eq!(compare_values(&json!(1), &json!("1"), true), None);
        assert_eq!(compare_values(&Value::Null, &json!(1), true), None);
        assert_eq!(compare_values(&json!([1]), &json!([1]), true), None);
    }

    #[test]
    fn blankness_and_rendering() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!("  ")));
        assert!(is_blank(&json!({})));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(false)));
        assert_eq!(render_scalar(&json!("Jo")), "Jo");
        assert_eq!(render_scalar(&json!(25)), "25");
        assert_eq!(type_name(&json!([])), "array");
    }

    #[test]
    fn lenient_coercions() {
        assert_eq!(as_f64_lenient(&json!(" 4.5 ")), Some(4.5));
        assert_eq!(as_f64_lenient(&json!("NaN")), None);
        assert_eq!(as_f64_lenient(&json!(true)), None);
        assert_eq!(as_bool_lenient(&json!("true")), Some(true));
        assert_eq!(as_bool_lenient(&json!("TRUE")), None);
    }
}

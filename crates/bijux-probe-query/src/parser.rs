// SPDX-License-Identifier: Apache-2.0

use crate::error::QuerySpecError;
use crate::spec::{FilterPredicate, QuerySpec, Scalar, SortDirection, SortField, ViewSpec};
use std::collections::BTreeMap;
use url::Url;

const PLACEHOLDER_BASE: &str = "http://probe.invalid/";

pub const PARAM_SORT: &str = "sort";
pub const PARAM_FILTER: &str = "filter";
pub const PARAM_VIEW: &str = "view";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_PAGE_SIZE: &str = "pageSize";

/// Parses the query component of a recorded request URL.
///
/// Accepts absolute URLs, rooted paths (`/api/User?sort=age`) and bare query
/// strings (`sort=age`). Malformed sort/filter/view tokens are dropped one by
/// one; only a URL that cannot be parsed at all is an error.
pub fn parse_query_spec(raw_url: &str) -> Result<QuerySpec, QuerySpecError> {
    let url = parse_url(raw_url)?;
    Ok(parse_query_pairs(
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned())),
    ))
}

/// Path component of a recorded request URL, e.g. `/api/User`.
pub fn request_path(raw_url: &str) -> Result<String, QuerySpecError> {
    let url = parse_url(raw_url)?;
    Ok(url.path().to_string())
}

/// Builds a spec from already decoded query pairs. Repeated `sort`, `filter`
/// and `view` params are applied in order.
pub fn parse_query_pairs<I>(pairs: I) -> QuerySpec
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut spec = QuerySpec::default();
    for (key, value) in pairs {
        match key.as_str() {
            PARAM_SORT => spec.sort.extend(parse_sort(&value)),
            PARAM_FILTER => spec.filter.extend(parse_filter(&value)),
            PARAM_VIEW => {
                for (entity, fields) in parse_view(&value) {
                    spec.view.entry(entity).or_default().extend(fields);
                }
            }
            PARAM_PAGE => {
                if let Some(page) = parse_positive(&value) {
                    spec.page = page;
                }
            }
            PARAM_PAGE_SIZE => {
                if let Some(size) = parse_positive(&value) {
                    spec.page_size = size;
                }
            }
            _ => {}
        }
    }
    spec
}

/// `field[:direction]` tokens separated by commas. Duplicates are kept.
#[must_use]
pub fn parse_sort(raw: &str) -> Vec<SortField> {
    raw.split(',')
        .filter_map(|token| {
            let (field, direction) = match token.split_once(':') {
                Some((field, direction)) => {
                    (field.trim(), SortDirection::parse_lenient(direction))
                }
                None => (token.trim(), SortDirection::Asc),
            };
            (!field.is_empty()).then(|| SortField {
                field: field.to_string(),
                direction,
            })
        })
        .collect()
}

/// `field:value` or `field:operator:value` tokens separated by commas.
/// A later predicate on the same field replaces the earlier one.
#[must_use]
pub fn parse_filter(raw: &str) -> BTreeMap<String, FilterPredicate> {
    let mut out = BTreeMap::new();
    for token in raw.split(',') {
        let parts: Vec<&str> = token.splitn(3, ':').collect();
        let (field, predicate) = match parts.as_slice() {
            [field, value] => (field.trim(), FilterPredicate::eq(Scalar::infer(value))),
            [field, operator, value] => (
                field.trim(),
                FilterPredicate {
                    operator: operator.trim().to_lowercase(),
                    value: Scalar::infer(value),
                },
            ),
            _ => continue,
        };
        if field.is_empty() {
            continue;
        }
        out.insert(field.to_string(), predicate);
    }
    out
}

/// `entity(field1,field2)` groups, e.g. `view=department(name),manager(email,phone)`.
#[must_use]
pub fn parse_view(raw: &str) -> ViewSpec {
    let mut out: ViewSpec = BTreeMap::new();
    for segment in raw.split(')') {
        let Some((entity, fields)) = segment.split_once('(') else {
            continue;
        };
        let entity = entity.trim_matches(|c: char| c == ',' || c.is_whitespace());
        if entity.is_empty() {
            continue;
        }
        let fields: Vec<String> = fields
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(ToString::to_string)
            .collect();
        if fields.is_empty() {
            continue;
        }
        out.entry(entity.to_string()).or_default().extend(fields);
    }
    out
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|v| *v > 0)
}

fn parse_url(raw_url: &str) -> Result<Url, QuerySpecError> {
    let trimmed = raw_url.trim();
    let base =
        Url::parse(PLACEHOLDER_BASE).map_err(|e| QuerySpecError::invalid_url(raw_url, &e))?;
    if is_bare_query(trimmed) {
        let mut url = base;
        url.set_query(Some(trimmed.trim_start_matches('?')));
        return Ok(url);
    }
    match Url::parse(trimmed) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(trimmed)
            .map_err(|e| QuerySpecError::invalid_url(raw_url, &e)),
        Err(e) => Err(QuerySpecError::invalid_url(raw_url, &e)),
    }
}

fn is_bare_query(raw: &str) -> bool {
    if raw.starts_with('?') {
        return true;
    }
    !raw.contains('?') && !raw.contains("://") && !raw.starts_with('/') && raw.contains('=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::DEFAULT_PAGE_SIZE;

    #[test]
    fn sort_defaults_to_ascending() {
        let spec = parse_query_spec("sort=lastName").expect("spec");
        assert_eq!(
            spec.sort,
            vec![SortField {
                field: "lastName".to_string(),
                direction: SortDirection::Asc,
            }]
        );
    }

    #[test]
    fn sort_tokens_are_trimmed_and_garbled_directions_fall_back() {
        let sort = parse_sort(" age : DESC , name:sideways,,:desc, age");
        let rendered: Vec<(String, SortDirection)> = sort
            .into_iter()
            .map(|s| (s.field, s.direction))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("age".to_string(), SortDirection::Desc),
                ("name".to_string(), SortDirection::Asc),
                ("age".to_string(), SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn filter_values_are_typed_in_priority_order() {
        assert_eq!(
            parse_query_spec("filter=age:25").expect("spec").filter["age"],
            FilterPredicate::eq(Scalar::Integer(25))
        );
        assert_eq!(
            parse_query_spec("filter=age:25.5").expect("spec").filter["age"],
            FilterPredicate::eq(Scalar::Float(25.5))
        );
        assert_eq!(
            parse_query_spec("filter=active:true").expect("spec").filter["active"],
            FilterPredicate::eq(Scalar::Boolean(true))
        );
        assert_eq!(
            parse_query_spec("filter=name:Jo").expect("spec").filter["name"],
            FilterPredicate::eq(Scalar::Text("Jo".to_string()))
        );
        assert_eq!(
            parse_query_spec("filter=active:True").expect("spec").filter["active"],
            FilterPredicate::eq(Scalar::Text("True".to_string()))
        );
    }

    #[test]
    fn filter_operator_is_lowercased_and_value_keeps_colons() {
        let filter = parse_filter("age:GTE:18,startsAt:eq:10:30,broken,:eq:5");
        assert_eq!(filter.len(), 2);
        assert_eq!(filter["age"].operator, "gte");
        assert_eq!(filter["age"].value, Scalar::Integer(18));
        assert_eq!(filter["startsAt"].value, Scalar::Text("10:30".to_string()));
    }

    #[test]
    fn view_groups_preserve_field_order_and_drop_empty_groups() {
        let view = parse_view("department(name, code),manager( ),(orphan),team(lead,)");
        assert_eq!(view.len(), 2);
        assert_eq!(view["department"], vec!["name".to_string(), "code".to_string()]);
        assert_eq!(view["team"], vec!["lead".to_string()]);
    }

    #[test]
    fn pagination_only_accepts_positive_integers() {
        let spec = parse_query_spec("/api/User?page=3&pageSize=8").expect("spec");
        assert_eq!((spec.page, spec.page_size), (3, 8));
        let spec = parse_query_spec("/api/User?page=0&pageSize=-4").expect("spec");
        assert_eq!((spec.page, spec.page_size), (1, DEFAULT_PAGE_SIZE));
        let spec = parse_query_spec("/api/User?page=two").expect("spec");
        assert_eq!(spec.page, 1);
    }

    #[test]
    fn percent_encoded_recorded_urls_are_decoded() {
        let spec = parse_query_spec(
            "http://localhost:8080/api/User?sort=age%3Adesc&view=department%28name%29",
        )
        .expect("spec");
        assert_eq!(spec.sort[0].direction, SortDirection::Desc);
        assert_eq!(spec.view["department"], vec!["name".to_string()]);
    }

    #[test]
    fn structurally_invalid_url_is_an_error() {
        let err = parse_query_spec("http://[::1/api").expect_err("invalid url");
        assert!(err.to_string().contains("http://[::1/api"));
    }

    #[test]
    fn request_path_ignores_host_and_query() {
        assert_eq!(request_path("/api/User?page=2").expect("path"), "/api/User");
        assert_eq!(
            request_path("http://localhost:8080/api/Team/").expect("path"),
            "/api/Team/"
        );
    }

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(parse_query_spec("").expect("spec"), QuerySpec::default());
        assert_eq!(parse_query_spec("/api/User").expect("spec"), QuerySpec::default());
    }
}

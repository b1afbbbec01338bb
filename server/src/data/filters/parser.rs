//! Filter parsing
//!
//! Two request encodings produce the same ordered list of `FilterRequest`s:
//! - bracket query parameters: `filter[key]=v`, `filter[key][op]=v`,
//!   `filter[key][op][]=v` (repeat for lists)
//! - a JSON array in the `filters` parameter:
//!   `[{"key": "...", "operator": "...", "value": ...}]`

use crate::api::types::ApiError;
use crate::core::constants::{DEFAULT_MAX_FILTERS, DEFAULT_MAX_FILTER_JSON_BYTES};

use super::operator::{Arity, FilterOperator};
use super::request::{FilterRequest, FilterValue, RawScalar};

const FILTER_PARAM: &str = "filter";

/// Size limits applied to incoming filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterLimits {
    pub max_filters: usize,
    pub max_json_bytes: usize,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            max_filters: DEFAULT_MAX_FILTERS,
            max_json_bytes: DEFAULT_MAX_FILTER_JSON_BYTES,
        }
    }
}

/// Parse filters from the JSON query param
pub fn parse_filters(
    json_str: &str,
    limits: &FilterLimits,
) -> Result<Vec<FilterRequest>, ApiError> {
    if json_str.len() > limits.max_json_bytes {
        return Err(ApiError::bad_request(
            "FILTER_JSON_TOO_LARGE",
            format!(
                "Filter JSON exceeds maximum size of {} bytes",
                limits.max_json_bytes
            ),
        ));
    }

    let filters: Vec<FilterRequest> = serde_json::from_str(json_str)
        .map_err(|e| ApiError::bad_request("INVALID_FILTER_JSON", e.to_string()))?;

    check_count(filters.len(), limits)?;
    Ok(filters)
}

/// Parse bracket-style filter parameters, preserving their order.
///
/// Parameters not named `filter[...]` are ignored. `filter[key][op][]`
/// entries with the same key and operator are merged into one list.
pub fn parse_query_filters(
    pairs: &[(String, String)],
    limits: &FilterLimits,
) -> Result<Vec<FilterRequest>, ApiError> {
    let mut requests: Vec<FilterRequest> = Vec::new();
    // index into `requests` of list entries, by (key, operator)
    let mut lists: Vec<((String, String), usize)> = Vec::new();

    for (name, raw) in pairs {
        let Some(param) = parse_param_name(name)? else {
            continue;
        };

        if param.list {
            let slot = (param.key.clone(), param.operator.clone());
            match lists.iter().find(|(k, _)| *k == slot) {
                Some((_, i)) => {
                    if let Some(FilterValue::List(items)) = requests[*i].value.as_mut() {
                        items.push(RawScalar::from(raw.as_str()));
                    }
                }
                None => {
                    lists.push((slot, requests.len()));
                    requests.push(FilterRequest::new(
                        param.key,
                        param.operator,
                        Some(FilterValue::list([raw.as_str()])),
                    ));
                }
            }
            continue;
        }

        let value = match FilterOperator::parse(&param.operator).map(|op| op.arity()) {
            // `filter[email][isNull]` or `...=true` carries no value
            Some(Arity::None) if raw.is_empty() || raw == "true" => None,
            Some(Arity::List) => Some(FilterValue::list([raw.as_str()])),
            _ => Some(FilterValue::from(raw.as_str())),
        };
        requests.push(FilterRequest::new(param.key, param.operator, value));
    }

    check_count(requests.len(), limits)?;
    Ok(requests)
}

fn check_count(count: usize, limits: &FilterLimits) -> Result<(), ApiError> {
    if count > limits.max_filters {
        return Err(ApiError::bad_request(
            "TOO_MANY_FILTERS",
            format!("Maximum {} filters allowed", limits.max_filters),
        ));
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
struct FilterParam {
    key: String,
    operator: String,
    list: bool,
}

/// `filter[key]`, `filter[key][op]` or `filter[key][op][]`
fn parse_param_name(name: &str) -> Result<Option<FilterParam>, ApiError> {
    let Some(rest) = name.strip_prefix(FILTER_PARAM) else {
        return Ok(None);
    };
    if !rest.starts_with('[') {
        return Ok(None);
    }

    let invalid = || {
        ApiError::bad_request(
            "INVALID_FILTER_PARAM",
            format!("Malformed filter parameter '{}'", name),
        )
    };

    let mut groups = Vec::new();
    let mut remaining = rest;
    while !remaining.is_empty() {
        let inner = remaining.strip_prefix('[').ok_or_else(invalid)?;
        let end = inner.find(']').ok_or_else(invalid)?;
        groups.push(&inner[..end]);
        remaining = &inner[end + 1..];
    }

    match groups.as_slice() {
        [key] if !key.is_empty() => Ok(Some(FilterParam {
            key: key.to_string(),
            operator: FilterOperator::Equals.as_str().to_string(),
            list: false,
        })),
        [key, op] if !key.is_empty() && !op.is_empty() => Ok(Some(FilterParam {
            key: key.to_string(),
            operator: op.to_string(),
            list: false,
        })),
        [key, op, ""] if !key.is_empty() && !op.is_empty() => Ok(Some(FilterParam {
            key: key.to_string(),
            operator: op.to_string(),
            list: true,
        })),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_filters_valid_json() {
        let json = r#"[
            {"key": "status", "operator": "in", "value": ["paid", "sent"]},
            {"key": "customer.email", "operator": "isNull"}
        ]"#;
        let filters = parse_filters(json, &FilterLimits::default()).unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].value, Some(FilterValue::list(["paid", "sent"])));
        assert!(filters[1].value.is_none());
    }

    #[test]
    fn parse_filters_invalid_json() {
        let result = parse_filters("not valid json", &FilterLimits::default());
        assert!(result.is_err());
    }

    #[test]
    fn parse_filters_enforces_limits() {
        let limits = FilterLimits {
            max_filters: 1,
            max_json_bytes: 1024,
        };
        let json = r#"[
            {"key": "a", "operator": "equals", "value": 1},
            {"key": "b", "operator": "equals", "value": 2}
        ]"#;
        assert!(parse_filters(json, &limits).is_err());

        let limits = FilterLimits {
            max_filters: 10,
            max_json_bytes: 8,
        };
        assert!(parse_filters("[]        ", &limits).is_err());
    }

    #[test]
    fn bracket_defaults_to_equals() {
        let filters = parse_query_filters(
            &pairs(&[("filter[number]", "INV-1"), ("page", "2")]),
            &FilterLimits::default(),
        )
        .unwrap();
        assert_eq!(
            filters,
            vec![FilterRequest::new("number", "equals", Some("INV-1".into()))]
        );
    }

    #[test]
    fn bracket_lists_merge_in_order() {
        let filters = parse_query_filters(
            &pairs(&[
                ("filter[lineItems.product_name][notIn][]", "Widget"),
                ("filter[total_amount][greaterThanOrEquals]", "100"),
                ("filter[lineItems.product_name][notIn][]", "Gadget"),
            ]),
            &FilterLimits::default(),
        )
        .unwrap();
        assert_eq!(
            filters,
            vec![
                FilterRequest::new(
                    "lineItems.product_name",
                    "notIn",
                    Some(FilterValue::list(["Widget", "Gadget"]))
                ),
                FilterRequest::new("total_amount", "greaterThanOrEquals", Some("100".into())),
            ]
        );
    }

    #[test]
    fn bracket_membership_scalar_becomes_list() {
        let filters = parse_query_filters(
            &pairs(&[("filter[status][in]", "paid")]),
            &FilterLimits::default(),
        )
        .unwrap();
        assert_eq!(filters[0].value, Some(FilterValue::list(["paid"])));
    }

    #[test]
    fn bracket_null_operator_without_value() {
        let filters = parse_query_filters(
            &pairs(&[
                ("filter[customer.email][isNull]", ""),
                ("filter[paid_at][isNotNull]", "true"),
                ("filter[paid_at][isNull]", "yesterday"),
            ]),
            &FilterLimits::default(),
        )
        .unwrap();
        assert!(filters[0].value.is_none());
        assert!(filters[1].value.is_none());
        assert_eq!(filters[2].value, Some(FilterValue::from("yesterday")));
    }

    #[test]
    fn bracket_range_keeps_both_entries() {
        let filters = parse_query_filters(
            &pairs(&[
                ("filter[issued_at][greaterThanOrEquals]", "2025-01-01"),
                ("filter[issued_at][lessThanOrEquals]", "2025-01-31"),
            ]),
            &FilterLimits::default(),
        )
        .unwrap();
        assert_eq!(filters.len(), 2);
        assert!(filters.iter().all(|f| f.key == "issued_at"));
    }

    #[test]
    fn bracket_rejects_malformed_names() {
        for name in [
            "filter[]",
            "filter[number",
            "filter[number]x",
            "filter[number][equals][x]",
            "filter[number][][]",
        ] {
            let result = parse_query_filters(&pairs(&[(name, "1")]), &FilterLimits::default());
            assert!(result.is_err(), "{} should be rejected", name);
        }
    }

    #[test]
    fn bracket_ignores_other_params() {
        let filters = parse_query_filters(
            &pairs(&[("filters", "[]"), ("filtered", "1"), ("order_by", "number")]),
            &FilterLimits::default(),
        )
        .unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn bracket_enforces_count_limit() {
        let limits = FilterLimits {
            max_filters: 1,
            max_json_bytes: 1024,
        };
        let result = parse_query_filters(
            &pairs(&[("filter[a]", "1"), ("filter[b]", "2")]),
            &limits,
        );
        assert!(result.is_err());
    }
}

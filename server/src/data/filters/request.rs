//! Filter request types
//!
//! One `FilterRequest` per query-filter entry, before key validation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar exactly as it arrived on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

/// Request value: a single scalar or a list of scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    List(Vec<RawScalar>),
    Scalar(RawScalar),
}

/// One `{key, operator, value}` filter entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub key: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

impl FilterRequest {
    pub fn new(
        key: impl Into<String>,
        operator: impl Into<String>,
        value: Option<FilterValue>,
    ) -> Self {
        Self {
            key: key.into(),
            operator: operator.into(),
            value,
        }
    }
}

impl FilterValue {
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RawScalar>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl RawScalar {
    /// Textual form used in error messages and for text coercion
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for RawScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{}", s),
            Self::List(items) => {
                let joined: Vec<String> = items.iter().map(RawScalar::as_text).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

impl From<&str> for RawScalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawScalar {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for RawScalar {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<bool> for RawScalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<RawScalar> for FilterValue {
    fn from(value: RawScalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.into())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Scalar(s.into())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Scalar(n.into())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Scalar(b.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_scalar_and_list_values() {
        let json = r#"[
            {"key": "status", "operator": "equals", "value": "paid"},
            {"key": "lineItems.product_name", "operator": "in", "value": ["Widget", "Gadget"]},
            {"key": "is_recurring", "operator": "equals", "value": true},
            {"key": "total_amount", "operator": "greaterThan", "value": 100},
            {"key": "customer.email", "operator": "isNull"}
        ]"#;
        let requests: Vec<FilterRequest> = serde_json::from_str(json).unwrap();

        assert_eq!(requests[0].value, Some(FilterValue::from("paid")));
        assert_eq!(
            requests[1].value,
            Some(FilterValue::list(["Widget", "Gadget"]))
        );
        assert_eq!(requests[2].value, Some(FilterValue::from(true)));
        assert_eq!(requests[3].value, Some(FilterValue::from(100i64)));
        assert_eq!(requests[4].value, None);
    }

    #[test]
    fn null_value_is_absent() {
        let request: FilterRequest =
            serde_json::from_str(r#"{"key": "paid_at", "operator": "isNull", "value": null}"#)
                .unwrap();
        assert!(request.value.is_none());
    }

    #[test]
    fn display_values() {
        assert_eq!(FilterValue::from("abc").to_string(), "abc");
        assert_eq!(FilterValue::list([1i64, 2]).to_string(), "[1, 2]");
        assert_eq!(RawScalar::from(false).to_string(), "false");
    }
}

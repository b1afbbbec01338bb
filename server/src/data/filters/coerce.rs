//! Value coercion and validation
//!
//! Turns the raw request value into typed `SqlValue`s according to the
//! field's declared type and the operator's arity.

use super::definition::{FilterDefinition, ValueType};
use super::error::FilterError;
use super::operator::{Arity, FilterOperator};
use super::predicate::SqlValue;
use super::request::{FilterValue, RawScalar};
use crate::utils::time::{format_date, format_datetime, parse_date, parse_datetime};

/// Validated request value
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    None,
    Scalar(SqlValue),
    List(Vec<SqlValue>),
}

impl CoercedValue {
    /// All values, scalar as a one-element list
    pub fn into_values(self) -> Vec<SqlValue> {
        match self {
            Self::None => Vec::new(),
            Self::Scalar(v) => vec![v],
            Self::List(vs) => vs,
        }
    }
}

/// Check arity, then coerce every element to the definition's type
pub fn coerce(
    def: &FilterDefinition,
    op: FilterOperator,
    value: Option<&FilterValue>,
) -> Result<CoercedValue, FilterError> {
    let field = def.external_key();

    match (op.arity(), value) {
        (Arity::None, None) => Ok(CoercedValue::None),
        (Arity::None, Some(v)) => Err(FilterError::invalid_value(
            field,
            v.to_string(),
            format!("operator '{}' does not take a value", op),
        )),
        (_, None) => Err(FilterError::invalid_value(
            field,
            "",
            format!("operator '{}' requires a value", op),
        )),
        (Arity::List, Some(FilterValue::Scalar(s))) => Err(FilterError::invalid_value(
            field,
            s.to_string(),
            format!("operator '{}' requires a list of values", op),
        )),
        (Arity::Scalar, Some(FilterValue::List(items))) => Err(FilterError::invalid_value(
            field,
            FilterValue::List(items.clone()).to_string(),
            format!("operator '{}' requires a single value", op),
        )),
        (_, Some(FilterValue::List(items))) if items.is_empty() => Err(
            FilterError::invalid_value(field, "[]", "list must contain at least one value"),
        ),
        (_, Some(FilterValue::List(items))) => items
            .iter()
            .map(|raw| coerce_scalar(def, raw))
            .collect::<Result<Vec<_>, _>>()
            .map(CoercedValue::List),
        (_, Some(FilterValue::Scalar(raw))) => coerce_scalar(def, raw).map(CoercedValue::Scalar),
    }
}

/// Coerce one scalar to the declared type
pub fn coerce_scalar(def: &FilterDefinition, raw: &RawScalar) -> Result<SqlValue, FilterError> {
    let field = def.external_key();
    let invalid = |reason: &str| FilterError::invalid_value(field, raw.as_text(), reason);

    match def.value_type() {
        ValueType::String => Ok(SqlValue::Text(raw.as_text())),
        ValueType::Number => coerce_number(raw).ok_or_else(|| invalid("expected a number")),
        ValueType::Date => match raw {
            RawScalar::Text(s) => parse_date(s)
                .map(|d| SqlValue::Text(format_date(d)))
                .ok_or_else(|| invalid("expected a date (YYYY-MM-DD)")),
            _ => Err(invalid("expected a date (YYYY-MM-DD)")),
        },
        ValueType::Datetime => match raw {
            RawScalar::Text(s) => parse_datetime(s)
                .map(|dt| SqlValue::Text(format_datetime(dt)))
                .ok_or_else(|| invalid("expected a datetime (YYYY-MM-DD HH:MM:SS or RFC 3339)")),
            _ => Err(invalid("expected a datetime (YYYY-MM-DD HH:MM:SS or RFC 3339)")),
        },
        ValueType::Boolean => coerce_bool(raw)
            .map(SqlValue::Bool)
            .ok_or_else(|| invalid("expected true, false, 1 or 0")),
        ValueType::Enum => {
            let Some(mapping) = def.enum_mapping() else {
                return Err(invalid("no enum mapping configured"));
            };
            let external = raw.as_text();
            mapping
                .to_internal(&external)
                .map(|internal| SqlValue::Text(internal.to_string()))
                .ok_or_else(|| FilterError::UnknownEnumValue {
                    field: field.to_string(),
                    value: external,
                    allowed: mapping.external_values(),
                })
        }
    }
}

fn coerce_number(raw: &RawScalar) -> Option<SqlValue> {
    match raw {
        RawScalar::Number(n) => n
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(SqlValue::Real)),
        RawScalar::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().map(SqlValue::Integer).ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(SqlValue::Real)
            })
        }
        RawScalar::Bool(_) => None,
    }
}

fn coerce_bool(raw: &RawScalar) -> Option<bool> {
    match raw {
        RawScalar::Bool(b) => Some(*b),
        RawScalar::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        RawScalar::Text(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
    }
}

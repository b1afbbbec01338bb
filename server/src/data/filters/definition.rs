//! Per-field filter configuration
//!
//! A `FilterDefinition` is built once when an endpoint registers its filters
//! and is read-only afterwards.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::operator::{FilterOperator, OperatorClass};
use super::path::PropertyPath;

/// Declared type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Date,
    Datetime,
    Boolean,
    Enum,
}

impl ValueType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
        }
    }

    /// Types with a meaningful ordering for lessThan/greaterThan
    pub const fn is_ordered(&self) -> bool {
        matches!(self, Self::Number | Self::Date | Self::Datetime)
    }

    pub fn supports(&self, op: FilterOperator) -> bool {
        match op.class() {
            OperatorClass::Nullability => true,
            OperatorClass::Equality => true,
            OperatorClass::Membership => !matches!(self, Self::Boolean),
            OperatorClass::Pattern => matches!(self, Self::String),
            OperatorClass::Ordering => self.is_ordered(),
        }
    }

    pub fn supported_operators(&self) -> BTreeSet<FilterOperator> {
        FilterOperator::ALL
            .into_iter()
            .filter(|op| self.supports(*op))
            .collect()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered translation table between stored and wire enum values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMapping {
    /// `(internal, external)` pairs in declaration order
    entries: Vec<(String, String)>,
}

impl EnumMapping {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Stored value for an external token
    pub fn to_internal(&self, external: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, ext)| ext == external)
            .map(|(internal, _)| internal.as_str())
    }

    /// External token for a stored value
    pub fn to_external(&self, internal: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(int, _)| int == internal)
            .map(|(_, external)| external.as_str())
    }

    /// Valid external tokens in declaration order
    pub fn external_values(&self) -> Vec<String> {
        self.entries.iter().map(|(_, ext)| ext.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// Configuration of one filterable field on an endpoint
#[derive(Debug, Clone)]
pub struct FilterDefinition {
    external_key: String,
    internal_path: String,
    path: PropertyPath,
    value_type: ValueType,
    allowed_operators: BTreeSet<FilterOperator>,
    enum_mapping: Option<EnumMapping>,
}

impl FilterDefinition {
    /// New definition allowing every operator the type supports.
    /// The internal path defaults to the external key.
    pub fn new(external_key: impl Into<String>, value_type: ValueType) -> Self {
        let external_key = external_key.into();
        Self {
            path: PropertyPath::parse(&external_key),
            internal_path: external_key.clone(),
            external_key,
            value_type,
            allowed_operators: value_type.supported_operators(),
            enum_mapping: None,
        }
    }

    pub fn string(key: impl Into<String>) -> Self {
        Self::new(key, ValueType::String)
    }

    pub fn number(key: impl Into<String>) -> Self {
        Self::new(key, ValueType::Number)
    }

    pub fn date(key: impl Into<String>) -> Self {
        Self::new(key, ValueType::Date)
    }

    pub fn datetime(key: impl Into<String>) -> Self {
        Self::new(key, ValueType::Datetime)
    }

    pub fn boolean(key: impl Into<String>) -> Self {
        Self::new(key, ValueType::Boolean)
    }

    pub fn enumeration(key: impl Into<String>, mapping: EnumMapping) -> Self {
        Self::new(key, ValueType::Enum).with_enum_mapping(mapping)
    }

    /// Map the external key onto a different relation path / column
    pub fn with_internal_path(mut self, path: impl Into<String>) -> Self {
        self.internal_path = path.into();
        self.path = PropertyPath::parse(&self.internal_path);
        self
    }

    /// Restrict the allowed operators
    pub fn with_operators<I>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = FilterOperator>,
    {
        self.allowed_operators = operators.into_iter().collect();
        self
    }

    pub fn with_enum_mapping(mut self, mapping: EnumMapping) -> Self {
        self.enum_mapping = Some(mapping);
        self
    }

    pub fn external_key(&self) -> &str {
        &self.external_key
    }

    pub fn internal_path(&self) -> &str {
        &self.internal_path
    }

    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn allowed_operators(&self) -> &BTreeSet<FilterOperator> {
        &self.allowed_operators
    }

    pub fn allows(&self, op: FilterOperator) -> bool {
        self.allowed_operators.contains(&op)
    }

    /// Allowed operator tokens, in taxonomy order
    pub fn allowed_operator_tokens(&self) -> Vec<String> {
        self.allowed_operators
            .iter()
            .map(|op| op.as_str().to_string())
            .collect()
    }

    pub fn enum_mapping(&self) -> Option<&EnumMapping> {
        self.enum_mapping.as_ref()
    }
}

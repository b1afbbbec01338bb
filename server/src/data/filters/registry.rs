//! Per-endpoint filter registry
//!
//! Built once at startup and shared behind an `Arc`. `resolve` is the
//! allow-list check applied to every incoming filter key.

use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;

use super::definition::{FilterDefinition, ValueType};
use super::error::FilterError;
use super::operator::FilterOperator;
use super::path::PropertyPath;
use super::request::FilterRequest;

/// Invalid filter configuration, raised at registration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Filter '{key}' is registered more than once")]
    DuplicateKey { key: String },

    #[error("Filter '{key}' allows no operators")]
    EmptyOperators { key: String },

    #[error("Filter '{key}' of type {value_type} cannot use operator '{operator}'")]
    UnsupportedOperator {
        key: String,
        operator: FilterOperator,
        value_type: ValueType,
    },

    #[error("Enum filter '{key}' has no value mapping")]
    MissingEnumMapping { key: String },

    #[error("Filter '{key}' has an invalid path: {reason}")]
    InvalidPath { key: String, reason: String },

    #[error("Filter '{key}' uses relation '{relation}' which has no join")]
    UnknownRelation { key: String, relation: String },
}

/// Catalog entry describing one filter to API clients
#[derive(Debug, Clone, Serialize)]
pub struct FilterDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub operators: Vec<FilterOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// Immutable map from external filter key to definition
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    definitions: Vec<FilterDefinition>,
    index: FxHashMap<String, usize>,
}

impl FilterRegistry {
    /// Validate and register definitions, keeping declaration order
    pub fn new<I>(definitions: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = FilterDefinition>,
    {
        let definitions: Vec<FilterDefinition> = definitions.into_iter().collect();
        let mut index = FxHashMap::default();

        for (i, def) in definitions.iter().enumerate() {
            validate_definition(def)?;
            if index.insert(def.external_key().to_string(), i).is_some() {
                return Err(RegistryError::DuplicateKey {
                    key: def.external_key().to_string(),
                });
            }
        }

        tracing::debug!(filters = definitions.len(), "Filter registry built");
        Ok(Self { definitions, index })
    }

    pub fn get(&self, key: &str) -> Option<&FilterDefinition> {
        self.index.get(key).map(|&i| &self.definitions[i])
    }

    /// Definition for the request's key, or `UnknownFilter`
    pub fn resolve(&self, request: &FilterRequest) -> Result<&FilterDefinition, FilterError> {
        self.get(&request.key).ok_or_else(|| FilterError::UnknownFilter {
            field: request.key.clone(),
        })
    }

    pub fn definitions(&self) -> &[FilterDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Client-facing description of every filter, in declaration order
    pub fn catalog(&self) -> Vec<FilterDescriptor> {
        self.definitions
            .iter()
            .map(|def| FilterDescriptor {
                key: def.external_key().to_string(),
                value_type: def.value_type(),
                operators: def.allowed_operators().iter().copied().collect(),
                values: def.enum_mapping().map(|m| m.external_values()),
            })
            .collect()
    }
}

fn validate_definition(def: &FilterDefinition) -> Result<(), RegistryError> {
    let key = def.external_key();

    for path in [key, def.internal_path()] {
        PropertyPath::parse_strict(path).map_err(|reason| RegistryError::InvalidPath {
            key: key.to_string(),
            reason,
        })?;
    }

    if def.allowed_operators().is_empty() {
        return Err(RegistryError::EmptyOperators {
            key: key.to_string(),
        });
    }

    if let Some(op) = def
        .allowed_operators()
        .iter()
        .find(|op| !def.value_type().supports(**op))
    {
        return Err(RegistryError::UnsupportedOperator {
            key: key.to_string(),
            operator: *op,
            value_type: def.value_type(),
        });
    }

    if def.value_type() == ValueType::Enum && def.enum_mapping().is_none_or(|m| m.is_empty()) {
        return Err(RegistryError::MissingEnumMapping {
            key: key.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::definition::EnumMapping;

    fn status() -> FilterDefinition {
        FilterDefinition::enumeration("status", EnumMapping::new([("P", "paid"), ("V", "void")]))
    }

    #[test]
    fn resolve_known_and_unknown_keys() {
        let registry = FilterRegistry::new([FilterDefinition::string("number"), status()]).unwrap();
        assert_eq!(registry.len(), 2);

        let def = registry
            .resolve(&FilterRequest::new("status", "equals", Some("paid".into())))
            .unwrap();
        assert_eq!(def.value_type(), ValueType::Enum);

        let err = registry
            .resolve(&FilterRequest::new("password", "equals", Some("x".into())))
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot filter by 'password'");
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = FilterRegistry::new([
            FilterDefinition::string("number"),
            FilterDefinition::string("number"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateKey {
                key: "number".to_string()
            }
        );
    }

    #[test]
    fn rejects_empty_and_unsupported_operators() {
        let err = FilterRegistry::new([
            FilterDefinition::string("number").with_operators(Vec::new())
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::EmptyOperators { .. }));

        let err = FilterRegistry::new([
            FilterDefinition::boolean("is_recurring").with_operators([FilterOperator::In])
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Filter 'is_recurring' of type boolean cannot use operator 'in'"
        );
    }

    #[test]
    fn rejects_enum_without_mapping() {
        let err =
            FilterRegistry::new([FilterDefinition::new("status", ValueType::Enum)]).unwrap_err();
        assert!(matches!(err, RegistryError::MissingEnumMapping { .. }));

        let err = FilterRegistry::new([FilterDefinition::enumeration(
            "status",
            EnumMapping::new(Vec::<(String, String)>::new()),
        )])
        .unwrap_err();
        assert!(matches!(err, RegistryError::MissingEnumMapping { .. }));
    }

    #[test]
    fn rejects_malformed_paths() {
        let err = FilterRegistry::new([
            FilterDefinition::string("customer.country").with_internal_path("customer..country")
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPath { .. }));

        let err = FilterRegistry::new([FilterDefinition::string("name; --")]).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPath { .. }));
    }

    #[test]
    fn catalog_lists_operators_and_enum_values() {
        let registry = FilterRegistry::new([
            FilterDefinition::boolean("is_recurring"),
            status().with_operators([FilterOperator::Equals, FilterOperator::In]),
        ])
        .unwrap();

        let json = serde_json::to_value(registry.catalog()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {
                    "key": "is_recurring",
                    "type": "boolean",
                    "operators": ["equals", "notEquals", "isNull", "isNotNull"]
                },
                {
                    "key": "status",
                    "type": "enum",
                    "operators": ["equals", "in"],
                    "values": ["paid", "void"]
                }
            ])
        );
    }
}

//! Filter error types

use thiserror::Error;

/// Field-scoped failure raised while resolving or compiling a filter request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Operator token unrecognized, or recognized but not allowed for the field
    #[error(
        "Operator '{operator}' is not supported for filter '{field}'. Valid operators: {}",
        .allowed.join(", ")
    )]
    UnsupportedOperator {
        field: String,
        operator: String,
        allowed: Vec<String>,
    },

    /// Value does not fit the declared type or the operator's arity
    #[error("Invalid value '{value}' for filter '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Enum value absent from the field's mapping
    #[error(
        "Unknown value '{value}' for filter '{field}'. Valid values: {}",
        .allowed.join(", ")
    )]
    UnknownEnumValue {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    /// Filter key not registered for the endpoint
    #[error("Cannot filter by '{field}'")]
    UnknownFilter { field: String },

    /// Relation referenced by a filter path is missing from the query schema
    #[error("Relation '{relation}' is not defined on '{table}'")]
    UnknownRelation { relation: String, table: String },
}

impl FilterError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Field the error is scoped to (the relation name for schema errors)
    pub fn field(&self) -> &str {
        match self {
            Self::UnsupportedOperator { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::UnknownEnumValue { field, .. }
            | Self::UnknownFilter { field } => field,
            Self::UnknownRelation { relation, .. } => relation,
        }
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedOperator { .. } => "UNSUPPORTED_FILTER_OPERATOR",
            Self::InvalidValue { .. } => "INVALID_FILTER_VALUE",
            Self::UnknownEnumValue { .. } => "UNKNOWN_ENUM_VALUE",
            Self::UnknownFilter { .. } => "INVALID_FILTER_KEY",
            Self::UnknownRelation { .. } => "UNKNOWN_RELATION",
        }
    }

    /// Errors caused by the request rather than server configuration
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::UnknownRelation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_operator_lists_allowed() {
        let err = FilterError::UnsupportedOperator {
            field: "status".to_string(),
            operator: "contains".to_string(),
            allowed: vec!["equals".to_string(), "in".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Operator 'contains' is not supported for filter 'status'. Valid operators: equals, in"
        );
        assert_eq!(err.field(), "status");
        assert_eq!(err.code(), "UNSUPPORTED_FILTER_OPERATOR");
    }

    #[test]
    fn invalid_value_names_field_and_literal() {
        let err = FilterError::invalid_value("total_amount", "12abc", "expected a number");
        assert_eq!(
            err.to_string(),
            "Invalid value '12abc' for filter 'total_amount': expected a number"
        );
    }

    #[test]
    fn unknown_enum_value_lists_tokens() {
        let err = FilterError::UnknownEnumValue {
            field: "status".to_string(),
            value: "archived".to_string(),
            allowed: vec!["active".to_string(), "inactive".to_string()],
        };
        assert!(err.to_string().ends_with("Valid values: active, inactive"));
    }

    #[test]
    fn unknown_relation_is_not_client_error() {
        let err = FilterError::UnknownRelation {
            relation: "owner".to_string(),
            table: "invoices".to_string(),
        };
        assert!(!err.is_client_error());
        assert!(FilterError::UnknownFilter {
            field: "x".to_string()
        }
        .is_client_error());
    }
}

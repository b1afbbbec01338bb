//! Filter operator vocabulary
//!
//! The 14 wire tokens accepted in `filter[key][operator]=value` and their
//! arity and polarity rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operator applied by a single filter request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
    IsNull,
    IsNotNull,
}

/// Operator families sharing arity rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Equality,
    Membership,
    Pattern,
    Ordering,
    Nullability,
}

/// Accepted shape of the request value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A single value or a list of values
    ScalarOrList,
    /// A list of values only
    List,
    /// A single value only
    Scalar,
    /// No value
    None,
}

/// Whether an operator asserts presence or absence of matching rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 14] = [
        Self::Equals,
        Self::NotEquals,
        Self::In,
        Self::NotIn,
        Self::Contains,
        Self::NotContains,
        Self::StartsWith,
        Self::EndsWith,
        Self::LessThan,
        Self::LessThanOrEquals,
        Self::GreaterThan,
        Self::GreaterThanOrEquals,
        Self::IsNull,
        Self::IsNotNull,
    ];

    /// Wire token (lowerCamelCase)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::LessThan => "lessThan",
            Self::LessThanOrEquals => "lessThanOrEquals",
            Self::GreaterThan => "greaterThan",
            Self::GreaterThanOrEquals => "greaterThanOrEquals",
            Self::IsNull => "isNull",
            Self::IsNotNull => "isNotNull",
        }
    }

    /// Parse a wire token. Matching is exact; tokens are case-sensitive.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == token)
    }

    pub const fn class(&self) -> OperatorClass {
        match self {
            Self::Equals | Self::NotEquals => OperatorClass::Equality,
            Self::In | Self::NotIn => OperatorClass::Membership,
            Self::Contains | Self::NotContains | Self::StartsWith | Self::EndsWith => {
                OperatorClass::Pattern
            }
            Self::LessThan
            | Self::LessThanOrEquals
            | Self::GreaterThan
            | Self::GreaterThanOrEquals => OperatorClass::Ordering,
            Self::IsNull | Self::IsNotNull => OperatorClass::Nullability,
        }
    }

    pub const fn arity(&self) -> Arity {
        match self.class() {
            OperatorClass::Equality | OperatorClass::Pattern => Arity::ScalarOrList,
            OperatorClass::Membership => Arity::List,
            OperatorClass::Ordering => Arity::Scalar,
            OperatorClass::Nullability => Arity::None,
        }
    }

    /// Negative operators are compiled as "no related row matches the
    /// positive counterpart" on relation paths.
    pub const fn polarity(&self) -> Polarity {
        match self {
            Self::NotEquals | Self::NotIn | Self::NotContains | Self::IsNull => Polarity::Negative,
            _ => Polarity::Positive,
        }
    }

    /// Positive form of a negative operator; positive operators map to themselves.
    pub const fn positive(&self) -> Self {
        match self {
            Self::NotEquals => Self::Equals,
            Self::NotIn => Self::In,
            Self::NotContains => Self::Contains,
            Self::IsNull => Self::IsNotNull,
            other => *other,
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown filter operator '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_through_parse() {
        for op in FilterOperator::ALL {
            assert_eq!(FilterOperator::parse(op.as_str()), Some(op));
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(FilterOperator::parse("notequals"), None);
        assert_eq!(FilterOperator::parse("NOTEQUALS"), None);
        assert_eq!(FilterOperator::parse("between"), None);
        assert_eq!(FilterOperator::parse(""), None);
    }

    #[test]
    fn serde_uses_wire_tokens() {
        let op: FilterOperator = serde_json::from_str(r#""greaterThanOrEquals""#).unwrap();
        assert_eq!(op, FilterOperator::GreaterThanOrEquals);
        assert_eq!(
            serde_json::to_string(&FilterOperator::NotContains).unwrap(),
            r#""notContains""#
        );
    }

    #[test]
    fn arity_by_class() {
        assert_eq!(FilterOperator::Equals.arity(), Arity::ScalarOrList);
        assert_eq!(FilterOperator::NotContains.arity(), Arity::ScalarOrList);
        assert_eq!(FilterOperator::NotIn.arity(), Arity::List);
        assert_eq!(FilterOperator::LessThanOrEquals.arity(), Arity::Scalar);
        assert_eq!(FilterOperator::IsNotNull.arity(), Arity::None);
    }

    #[test]
    fn negative_operators_have_positive_counterparts() {
        let negatives: Vec<_> = FilterOperator::ALL
            .into_iter()
            .filter(|op| op.polarity() == Polarity::Negative)
            .collect();
        assert_eq!(
            negatives,
            vec![
                FilterOperator::NotEquals,
                FilterOperator::NotIn,
                FilterOperator::NotContains,
                FilterOperator::IsNull,
            ]
        );
        for op in negatives {
            assert_eq!(op.positive().polarity(), Polarity::Positive);
        }
        assert_eq!(FilterOperator::StartsWith.positive(), FilterOperator::StartsWith);
    }
}

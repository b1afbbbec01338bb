//! Filter request → predicate compilation
//!
//! A request is compiled into a complete `Predicate` before anything is
//! handed to the query target, so a failing request never leaves a partial
//! predicate behind.
//!
//! Local paths compile to plain column predicates. Relation paths wrap the
//! leaf predicate in existence scopes, one per hop. Negative operators
//! (`notEquals`, `notIn`, `notContains`, `isNull`) become "no related row
//! matches the positive form", so entities without related rows pass them.

use super::coerce::{CoercedValue, coerce};
use super::definition::{FilterDefinition, ValueType};
use super::error::FilterError;
use super::operator::{FilterOperator, Polarity};
use super::predicate::{Column, CompareOp, Predicate, SqlValue};
use super::registry::FilterRegistry;
use super::request::FilterRequest;
use super::target::QueryTarget;
use crate::utils::sql::{LikeAnchor, like_pattern};
use crate::utils::time::ZERO_DATETIME;

/// Leaf column and type information threaded through compilation
#[derive(Debug, Clone, Copy)]
struct LeafContext<'a> {
    column: &'a str,
    value_type: ValueType,
}

impl<'a> LeafContext<'a> {
    fn new(def: &'a FilterDefinition) -> Self {
        Self {
            column: &def.path().leaf_column,
            value_type: def.value_type(),
        }
    }

    /// Date filters compare calendar days only
    fn column(&self) -> Column {
        match self.value_type {
            ValueType::Date => Column::day(self.column),
            _ => Column::new(self.column),
        }
    }

    fn null_column(&self) -> Column {
        Column::new(self.column)
    }

    /// Stored value treated as NULL by isNull/isNotNull
    fn null_sentinel(&self) -> Option<SqlValue> {
        match self.value_type {
            ValueType::Datetime => Some(SqlValue::Text(ZERO_DATETIME.to_string())),
            _ => None,
        }
    }

    fn compare(&self, op: CompareOp, value: SqlValue) -> Predicate {
        Predicate::Compare {
            column: self.column(),
            op,
            value,
        }
    }

    fn in_list(&self, values: Vec<SqlValue>, negated: bool) -> Predicate {
        Predicate::InList {
            column: self.column(),
            values,
            negated,
        }
    }

    fn like(&self, value: &SqlValue, anchor: LikeAnchor, negated: bool) -> Predicate {
        let literal = match value {
            SqlValue::Text(s) => s.clone(),
            SqlValue::Integer(n) => n.to_string(),
            SqlValue::Real(f) => f.to_string(),
            SqlValue::Bool(b) => b.to_string(),
        };
        Predicate::Like {
            column: self.column(),
            pattern: like_pattern(&literal, anchor),
            negated,
        }
    }

    fn null_check(&self, negated: bool) -> Predicate {
        Predicate::IsNull {
            column: self.null_column(),
            negated,
            sentinel: self.null_sentinel(),
        }
    }

    /// Predicate on the leaf column itself, ignoring any relation chain
    fn leaf(&self, op: FilterOperator, value: CoercedValue) -> Predicate {
        match op {
            FilterOperator::Equals => match value {
                CoercedValue::List(values) => self.in_list(values, false),
                other => self.scalar_compare(CompareOp::Eq, other),
            },
            FilterOperator::NotEquals => match value {
                CoercedValue::List(values) => self.in_list(values, true),
                other => self.scalar_compare(CompareOp::Ne, other),
            },
            FilterOperator::In => self.in_list(value.into_values(), false),
            FilterOperator::NotIn => self.in_list(value.into_values(), true),
            FilterOperator::Contains => self.patterns(value, LikeAnchor::Anywhere),
            FilterOperator::StartsWith => self.patterns(value, LikeAnchor::Start),
            FilterOperator::EndsWith => self.patterns(value, LikeAnchor::End),
            FilterOperator::NotContains => Predicate::and(
                value
                    .into_values()
                    .iter()
                    .map(|v| self.like(v, LikeAnchor::Anywhere, true))
                    .collect(),
            ),
            FilterOperator::LessThan => self.scalar_compare(CompareOp::Lt, value),
            FilterOperator::LessThanOrEquals => self.scalar_compare(CompareOp::Lte, value),
            FilterOperator::GreaterThan => self.scalar_compare(CompareOp::Gt, value),
            FilterOperator::GreaterThanOrEquals => self.scalar_compare(CompareOp::Gte, value),
            FilterOperator::IsNull => self.null_check(false),
            FilterOperator::IsNotNull => self.null_check(true),
        }
    }

    /// OR of positive pattern matches ("any value")
    fn patterns(&self, value: CoercedValue, anchor: LikeAnchor) -> Predicate {
        Predicate::or(
            value
                .into_values()
                .iter()
                .map(|v| self.like(v, anchor, false))
                .collect(),
        )
    }

    fn scalar_compare(&self, op: CompareOp, value: CoercedValue) -> Predicate {
        // arity is checked during coercion; a scalar operator always has one value
        let values = value.into_values();
        Predicate::and(values.into_iter().map(|v| self.compare(op, v)).collect())
    }
}

/// Resolve the operator token against the definition
fn resolve_operator(def: &FilterDefinition, token: &str) -> Result<FilterOperator, FilterError> {
    FilterOperator::parse(token)
        .filter(|op| def.allows(*op) && def.value_type().supports(*op))
        .ok_or_else(|| FilterError::UnsupportedOperator {
            field: def.external_key().to_string(),
            operator: token.to_string(),
            allowed: def.allowed_operator_tokens(),
        })
}

/// Compile one request against its definition
pub fn compile(def: &FilterDefinition, request: &FilterRequest) -> Result<Predicate, FilterError> {
    let op = resolve_operator(def, &request.operator)?;
    let value = coerce(def, op, request.value.as_ref())?;
    let ctx = LeafContext::new(def);
    let chain = &def.path().relation_chain;

    let predicate = if chain.is_empty() {
        ctx.leaf(op, value)
    } else {
        match (op.polarity(), op, value) {
            (Polarity::Negative, op, value) => {
                Predicate::not_exists_through(chain, ctx.leaf(op.positive(), value))
            }
            // every listed value must be present on some related row
            (Polarity::Positive, FilterOperator::Equals, CoercedValue::List(values)) => {
                Predicate::and(
                    values
                        .into_iter()
                        .map(|v| Predicate::exists_through(chain, ctx.compare(CompareOp::Eq, v)))
                        .collect(),
                )
            }
            (Polarity::Positive, op, value) => {
                Predicate::exists_through(chain, ctx.leaf(op, value))
            }
        }
    };

    tracing::trace!(
        field = def.external_key(),
        operator = %op,
        path = %def.path(),
        "Compiled filter"
    );
    Ok(predicate)
}

/// Compile one request and AND it onto the target
pub fn apply<T: QueryTarget + ?Sized>(
    target: &mut T,
    def: &FilterDefinition,
    request: &FilterRequest,
) -> Result<(), FilterError> {
    let predicate = compile(def, request)?;
    target.add_predicate(predicate)
}

/// Resolve and compile every request in source order, then extend the target.
///
/// Stops at the first failing request; compile failures leave the target
/// untouched. Returns the number of predicates added.
pub fn compile_all<T: QueryTarget + ?Sized>(
    registry: &FilterRegistry,
    requests: &[FilterRequest],
    target: &mut T,
) -> Result<usize, FilterError> {
    let predicates = requests
        .iter()
        .map(|request| {
            let def = registry.resolve(request)?;
            compile(def, request)
        })
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| tracing::debug!(field = e.field(), code = e.code(), "Filter rejected"))?;

    let count = predicates.len();
    for predicate in predicates {
        target.add_predicate(predicate)?;
    }
    Ok(count)
}

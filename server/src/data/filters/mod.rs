//! REST filter compilation
//!
//! Turns `{key, operator, value}` filter requests into predicates on a
//! query target, including predicates that traverse relations.
//!
//! ## Usage
//!
//! ```no_run
//! use relquery_server::data::filters::{
//!     FilterDefinition, FilterRegistry, FilterRequest, PredicateCollector, compile_all,
//! };
//!
//! let registry = FilterRegistry::new([
//!     FilterDefinition::number("total_amount"),
//!     FilterDefinition::string("lineItems.product_name"),
//! ])
//! .unwrap();
//!
//! let requests = vec![
//!     FilterRequest::new("total_amount", "greaterThanOrEquals", Some(100i64.into())),
//!     FilterRequest::new("lineItems.product_name", "notContains", Some("Widget".into())),
//! ];
//! let mut target = PredicateCollector::new();
//! compile_all(&registry, &requests, &mut target).unwrap();
//! ```

mod coerce;
mod compiler;
mod definition;
mod error;
mod operator;
mod parser;
mod path;
mod predicate;
mod registry;
mod request;
mod target;

pub use coerce::{CoercedValue, coerce, coerce_scalar};
pub use compiler::{apply, compile, compile_all};
pub use definition::{EnumMapping, FilterDefinition, ValueType};
pub use error::FilterError;
pub use operator::{Arity, FilterOperator, OperatorClass, Polarity};
pub use parser::{FilterLimits, parse_filters, parse_query_filters};
pub use path::{PropertyPath, is_identifier};
pub use predicate::{Column, CompareOp, Predicate, SqlValue};
pub use registry::{FilterDescriptor, FilterRegistry, RegistryError};
pub use request::{FilterRequest, FilterValue, RawScalar};
pub use target::{PredicateCollector, QueryTarget};

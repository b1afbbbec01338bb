//! Filterable REST listings over SQLite
//!
//! Clients filter list endpoints with `filter[key][operator]=value` query
//! parameters. Each endpoint registers the keys it accepts; requests are
//! validated, coerced to the declared type and compiled into predicates
//! that traverse relations with existential or universal semantics.

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;

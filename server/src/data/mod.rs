//! Data storage layer
//!
//! - `filters` - REST filter compilation into predicates
//! - `sqlite` - SQLite service, SQL rendering of predicates, repositories
//! - `types` - Row types shared with the API layer
//! - `error` - Unified error type

pub mod error;
pub mod filters;
pub mod sqlite;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;

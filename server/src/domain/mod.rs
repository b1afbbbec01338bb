//! Domain bindings for the REST resources
//!
//! - `invoices` - filter catalog and relation joins for invoice listings

pub mod invoices;

pub use invoices::InvoiceCatalog;

//! SQLite repositories
//!
//! Types (InvoiceRow, NewInvoice, etc.) should be imported from `crate::data::types`.

pub mod customer;
pub mod invoice;
pub mod product;

pub use customer::insert_customer;
pub use invoice::{count_invoices, insert_invoice, insert_line_item, list_invoices};
pub use product::insert_product;

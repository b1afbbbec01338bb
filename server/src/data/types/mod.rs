//! Row types shared by the SQLite repositories and the API layer

use serde::{Deserialize, Serialize};

// ============================================================================
// Invoice types
// ============================================================================

/// Invoice row from database, joined with its customer name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRow {
    pub id: i64,
    pub number: String,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    /// Internal status code (`D`, `S`, `P`, `V`)
    pub status: String,
    pub total_amount: f64,
    /// `YYYY-MM-DD HH:MM:SS`
    pub issued_at: String,
    /// `YYYY-MM-DD HH:MM:SS`, or the all-zero sentinel when unpaid
    pub paid_at: String,
    pub is_recurring: bool,
    pub line_item_count: i64,
}

/// Invoice to insert
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub id: i64,
    pub number: String,
    pub customer_id: Option<i64>,
    pub status: String,
    pub total_amount: f64,
    pub issued_at: String,
    pub paid_at: Option<String>,
    pub is_recurring: bool,
}

// ============================================================================
// Customer / product / line item types
// ============================================================================

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub id: i64,
    pub name: String,
    pub country_code: String,
    pub status: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: i64,
    pub sku: String,
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub invoice_id: i64,
    pub product_id: Option<i64>,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
}

//! Invoice endpoint binding
//!
//! Declares which invoice fields clients may filter on, how external keys
//! map onto columns and relations, and how the invoice relations join.

use std::sync::Arc;

use crate::data::filters::{
    EnumMapping, FilterDefinition, FilterError, FilterOperator, FilterRegistry, FilterRequest,
    RegistryError, compile_all,
};
use crate::data::sqlite::{Relation, RelationCatalog, SqlQuery};

pub const INVOICE_TABLE: &str = "invoices";

/// Columns accepted by `order_by`
pub const INVOICE_ORDER_COLUMNS: &[&str] =
    &["id", "number", "total_amount", "issued_at", "paid_at"];

pub const DEFAULT_INVOICE_ORDER: &str = "issued_at";

pub fn invoice_status_mapping() -> EnumMapping {
    EnumMapping::new([("D", "draft"), ("S", "sent"), ("P", "paid"), ("V", "void")])
}

pub fn customer_status_mapping() -> EnumMapping {
    EnumMapping::new([("A", "active"), ("I", "inactive")])
}

/// Joins reachable from an invoice
pub fn invoice_relations() -> RelationCatalog {
    RelationCatalog::new()
        .with_relation(INVOICE_TABLE, "customer", Relation::new("customers", "customer_id", "id"))
        .with_relation(INVOICE_TABLE, "lineItems", Relation::new("line_items", "id", "invoice_id"))
        .with_relation("line_items", "product", Relation::new("products", "product_id", "id"))
}

/// Filters exposed on `GET /api/v1/invoices`
pub fn invoice_filters() -> Result<FilterRegistry, RegistryError> {
    use FilterOperator::*;

    FilterRegistry::new([
        FilterDefinition::string("number"),
        FilterDefinition::enumeration("status", invoice_status_mapping()),
        FilterDefinition::number("total_amount"),
        FilterDefinition::date("issued_at"),
        FilterDefinition::datetime("paid_at"),
        FilterDefinition::boolean("is_recurring"),
        FilterDefinition::string("customer.country")
            .with_internal_path("customer.country_code")
            .with_operators([Equals, NotEquals, In, NotIn, IsNull, IsNotNull]),
        FilterDefinition::enumeration("customer.status", customer_status_mapping()),
        FilterDefinition::string("customer.email"),
        FilterDefinition::string("lineItems.product_name"),
        FilterDefinition::number("lineItems.quantity"),
        FilterDefinition::string("lineItems.product.category")
            .with_operators([Equals, NotEquals, In, NotIn]),
    ])
}

/// Filter registry and relation catalog for the invoice listing
#[derive(Debug, Clone)]
pub struct InvoiceCatalog {
    registry: Arc<FilterRegistry>,
    relations: Arc<RelationCatalog>,
    status: EnumMapping,
}

impl InvoiceCatalog {
    pub fn new() -> Result<Self, RegistryError> {
        Self::from_parts(invoice_filters()?, invoice_relations())
    }

    /// Bind a registry to its relations; every relation path must join.
    pub fn from_parts(
        registry: FilterRegistry,
        relations: RelationCatalog,
    ) -> Result<Self, RegistryError> {
        for def in registry.definitions() {
            relations
                .walk(INVOICE_TABLE, &def.path().relation_chain)
                .map_err(|relation| RegistryError::UnknownRelation {
                    key: def.external_key().to_string(),
                    relation: relation.to_string(),
                })?;
        }

        Ok(Self {
            registry: Arc::new(registry),
            relations: Arc::new(relations),
            status: invoice_status_mapping(),
        })
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Query over `invoices` constrained by every request, in order
    pub fn build_query(&self, requests: &[FilterRequest]) -> Result<SqlQuery, FilterError> {
        let mut query = SqlQuery::new(Arc::clone(&self.relations), INVOICE_TABLE);
        compile_all(&self.registry, requests, &mut query)?;
        Ok(query)
    }

    /// Wire token for a stored status code
    pub fn status_token<'a>(&'a self, internal: &'a str) -> &'a str {
        self.status.to_external(internal).unwrap_or(internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::FilterValue;
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::{
        insert_customer, insert_invoice, insert_line_item, insert_product, list_invoices,
    };
    use crate::data::types::{NewCustomer, NewInvoice, NewLineItem, NewProduct};

    struct Fixture {
        db: SqliteService,
        catalog: InvoiceCatalog,
    }

    impl Fixture {
        async fn new() -> Self {
            let db = SqliteService::in_memory().await.unwrap();
            for (id, country, status, email) in [
                (1, "DE", "A", Some("a@example.test")),
                (2, "US", "I", None),
            ] {
                insert_customer(
                    db.pool(),
                    &NewCustomer {
                        id,
                        name: format!("Customer {}", id),
                        country_code: country.to_string(),
                        status: status.to_string(),
                        email: email.map(str::to_string),
                    },
                )
                .await
                .unwrap();
            }
            for (id, category) in [(1, "hardware"), (2, "toys")] {
                insert_product(
                    db.pool(),
                    &NewProduct {
                        id,
                        sku: format!("SKU-{}", id),
                        category: category.to_string(),
                    },
                )
                .await
                .unwrap();
            }
            Self {
                db,
                catalog: InvoiceCatalog::new().unwrap(),
            }
        }

        async fn invoice(&self, id: i64, customer_id: Option<i64>, total: f64, issued_at: &str) {
            insert_invoice(
                self.db.pool(),
                &NewInvoice {
                    id,
                    number: format!("INV-{}", id),
                    customer_id,
                    status: "S".to_string(),
                    total_amount: total,
                    issued_at: issued_at.to_string(),
                    paid_at: None,
                    is_recurring: false,
                },
            )
            .await
            .unwrap();
        }

        async fn item(&self, invoice_id: i64, product_id: Option<i64>, name: &str) {
            insert_line_item(
                self.db.pool(),
                &NewLineItem {
                    invoice_id,
                    product_id,
                    product_name: name.to_string(),
                    quantity: 1,
                    unit_price: 10.0,
                },
            )
            .await
            .unwrap();
        }

        /// Ids of invoices matching the requests, ascending
        async fn ids(&self, requests: Vec<FilterRequest>) -> Vec<i64> {
            let query = self.catalog.build_query(&requests).unwrap();
            list_invoices(self.db.pool(), &query, "t0.id ASC", 100, 0)
                .await
                .unwrap()
                .into_iter()
                .map(|row| row.id)
                .collect()
        }
    }

    /// A has a Widget line, B a Gadget line, C has no lines
    async fn widget_fixture() -> Fixture {
        let fx = Fixture::new().await;
        fx.invoice(1, Some(1), 100.0, "2025-01-10 10:00:00").await;
        fx.invoice(2, Some(2), 200.0, "2025-01-15 23:59:59").await;
        fx.invoice(3, None, 300.0, "2025-01-20 08:00:00").await;
        fx.item(1, Some(1), "Widget").await;
        fx.item(2, Some(2), "Gadget").await;
        fx
    }

    fn req(key: &str, op: &str, value: impl Into<FilterValue>) -> FilterRequest {
        FilterRequest::new(key, op, Some(value.into()))
    }

    #[test]
    fn invoice_filters_register() {
        let registry = invoice_filters().unwrap();
        assert_eq!(registry.len(), 12);
        assert_eq!(
            registry.get("customer.country").unwrap().internal_path(),
            "customer.country_code"
        );
    }

    #[test]
    fn catalog_rejects_relation_without_join() {
        let registry = FilterRegistry::new([
            FilterDefinition::string("number"),
            FilterDefinition::string("lineItems.vendor.name"),
        ])
        .unwrap();

        let err = InvoiceCatalog::from_parts(registry, invoice_relations()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnknownRelation { ref key, ref relation }
                if key == "lineItems.vendor.name" && relation == "vendor"
        ));
        assert!(InvoiceCatalog::new().is_ok());
    }

    #[tokio::test]
    async fn not_in_on_relation_includes_entities_without_rows() {
        let fx = widget_fixture().await;
        let ids = fx
            .ids(vec![req("lineItems.product_name", "notIn", FilterValue::list(["Widget"]))])
            .await;
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn equals_list_on_relation_requires_every_value() {
        let fx = widget_fixture().await;
        let both = || {
            req(
                "lineItems.product_name",
                "equals",
                FilterValue::list(["Widget", "Gadget"]),
            )
        };
        assert!(fx.ids(vec![both()]).await.is_empty());

        fx.invoice(4, None, 50.0, "2025-01-21 08:00:00").await;
        fx.item(4, Some(1), "Widget").await;
        fx.item(4, Some(2), "Gadget").await;
        assert_eq!(fx.ids(vec![both()]).await, vec![4]);
    }

    #[tokio::test]
    async fn positive_relation_filter_is_existential() {
        let fx = widget_fixture().await;
        assert_eq!(
            fx.ids(vec![req("lineItems.product_name", "contains", "idg")]).await,
            vec![1]
        );
        assert_eq!(
            fx.ids(vec![req("lineItems.product_name", "notContains", "idg")]).await,
            vec![2, 3]
        );
    }

    #[tokio::test]
    async fn date_equals_matches_whole_day() {
        let fx = widget_fixture().await;
        assert_eq!(
            fx.ids(vec![req("issued_at", "equals", "2025-01-15")]).await,
            vec![2]
        );
    }

    #[tokio::test]
    async fn repeated_key_forms_inclusive_range() {
        let fx = widget_fixture().await;
        let ids = fx
            .ids(vec![
                req("total_amount", "greaterThanOrEquals", 100i64),
                req("total_amount", "lessThanOrEquals", "200"),
            ])
            .await;
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn enum_filter_matches_internal_code() {
        let fx = widget_fixture().await;
        assert_eq!(
            fx.ids(vec![req("customer.status", "equals", "inactive")]).await,
            vec![2]
        );
        assert_eq!(fx.ids(vec![req("status", "equals", "sent")]).await, vec![1, 2, 3]);
        assert!(fx.ids(vec![req("status", "equals", "paid")]).await.is_empty());
    }

    #[tokio::test]
    async fn multi_hop_universal_filter() {
        let fx = widget_fixture().await;
        assert_eq!(
            fx.ids(vec![req("lineItems.product.category", "equals", "toys")]).await,
            vec![2]
        );
        assert_eq!(
            fx.ids(vec![req("lineItems.product.category", "notEquals", "toys")]).await,
            vec![1, 3]
        );
    }

    #[tokio::test]
    async fn null_checks_on_relations_and_sentinel() {
        let fx = widget_fixture().await;
        // invoice 2's customer has no email, invoice 3 has no customer
        assert_eq!(
            fx.ids(vec![FilterRequest::new("customer.email", "isNull", None)]).await,
            vec![2, 3]
        );
        assert_eq!(
            fx.ids(vec![FilterRequest::new("customer.email", "isNotNull", None)]).await,
            vec![1]
        );
        // unpaid invoices store the all-zero sentinel
        assert_eq!(
            fx.ids(vec![FilterRequest::new("paid_at", "isNull", None)]).await,
            vec![1, 2, 3]
        );
        assert!(
            fx.ids(vec![FilterRequest::new("paid_at", "isNotNull", None)])
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn renamed_relation_key_uses_internal_column() {
        let fx = widget_fixture().await;
        assert_eq!(
            fx.ids(vec![req("customer.country", "in", FilterValue::list(["DE"]))]).await,
            vec![1]
        );
    }

    #[test]
    fn build_query_rejects_unknown_key_and_bad_value() {
        let catalog = InvoiceCatalog::new().unwrap();
        let err = catalog
            .build_query(&[req("customer.password", "equals", "x")])
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_FILTER_KEY");

        let err = catalog
            .build_query(&[req("total_amount", "greaterThan", "abc")])
            .unwrap_err();
        assert_eq!(err.field(), "total_amount");
    }

    #[test]
    fn status_token_maps_codes() {
        let catalog = InvoiceCatalog::new().unwrap();
        assert_eq!(catalog.status_token("P"), "paid");
        assert_eq!(catalog.status_token("X"), "X");
    }
}

//! SQLite rendering of compiled filter predicates
//!
//! `SqlQuery` is the `QueryTarget` used by repositories. Relation scopes
//! render as correlated `EXISTS` subqueries joined through a
//! `RelationCatalog`; every value is bound as a `?` parameter.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use sqlx::Arguments;
use sqlx::error::BoxDynError;
use sqlx::sqlite::SqliteArguments;

use crate::data::filters::{Column, FilterError, Predicate, QueryTarget, SqlValue};
use crate::utils::sql::quote_ident;

/// Alias of the root table in rendered SQL
pub const ROOT_ALIAS: &str = "t0";

/// Join between a table and one of its named relations.
///
/// Rows of `target_table` belong to the parent row when
/// `target_table.foreign_key = parent.local_key`. This covers both
/// many-to-one (`customer_id` → `customers.id`) and one-to-many
/// (`invoices.id` ← `line_items.invoice_id`) relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub target_table: String,
    pub local_key: String,
    pub foreign_key: String,
}

impl Relation {
    pub fn new(
        target_table: impl Into<String>,
        local_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            target_table: target_table.into(),
            local_key: local_key.into(),
            foreign_key: foreign_key.into(),
        }
    }
}

/// Named relations per table
#[derive(Debug, Clone, Default)]
pub struct RelationCatalog {
    tables: FxHashMap<String, FxHashMap<String, Relation>>,
}

impl RelationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relation(
        mut self,
        table: impl Into<String>,
        name: impl Into<String>,
        relation: Relation,
    ) -> Self {
        self.tables
            .entry(table.into())
            .or_default()
            .insert(name.into(), relation);
        self
    }

    pub fn relation(&self, table: &str, name: &str) -> Option<&Relation> {
        self.tables.get(table).and_then(|rels| rels.get(name))
    }

    /// Follow `chain` from `table`; returns the last table reached, or the
    /// first relation name with no join registered.
    pub fn walk<'a>(&'a self, table: &'a str, chain: &'a [String]) -> Result<&'a str, &'a str> {
        chain.iter().try_fold(table, |current, name| {
            self.relation(current, name)
                .map(|rel| rel.target_table.as_str())
                .ok_or(name.as_str())
        })
    }
}

/// Bound parameters in placeholder order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    pub fn push(&mut self, value: SqlValue) {
        self.values.push(value);
    }

    /// Build sqlx arguments from the collected values
    pub fn to_arguments<'q>(&self) -> Result<SqliteArguments<'q>, BoxDynError> {
        let mut args = SqliteArguments::default();
        for value in &self.values {
            match value {
                SqlValue::Text(s) => args.add(s.clone())?,
                SqlValue::Integer(n) => args.add(*n)?,
                SqlValue::Real(f) => args.add(*f)?,
                SqlValue::Bool(b) => args.add(*b)?,
            }
        }
        Ok(args)
    }
}

/// WHERE clause under construction for a root table
#[derive(Debug, Clone)]
pub struct SqlQuery {
    catalog: Arc<RelationCatalog>,
    table: String,
    conditions: Vec<String>,
    params: SqlParams,
    next_alias: usize,
}

impl SqlQuery {
    pub fn new(catalog: Arc<RelationCatalog>, table: impl Into<String>) -> Self {
        Self {
            catalog,
            table: table.into(),
            conditions: Vec::new(),
            params: SqlParams::default(),
            next_alias: 1,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn params(&self) -> &SqlParams {
        &self.params
    }

    /// `WHERE a AND b ...`, or an empty string without conditions
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

impl QueryTarget for SqlQuery {
    fn qualify_column(&self, name: &str) -> String {
        format!("{}.{}", ROOT_ALIAS, quote_ident(name))
    }

    fn add_predicate(&mut self, predicate: Predicate) -> Result<(), FilterError> {
        let mut renderer = Renderer {
            catalog: &self.catalog,
            params: Vec::new(),
            next_alias: self.next_alias,
        };
        let sql = renderer.render(&predicate, &self.table, ROOT_ALIAS)?;

        let Renderer {
            params, next_alias, ..
        } = renderer;
        self.params.values.extend(params);
        self.next_alias = next_alias;
        self.conditions.push(sql);
        Ok(())
    }
}

/// Renders one predicate into scratch state, committed by the caller
struct Renderer<'a> {
    catalog: &'a RelationCatalog,
    params: Vec<SqlValue>,
    next_alias: usize,
}

impl Renderer<'_> {
    fn render(
        &mut self,
        predicate: &Predicate,
        table: &str,
        alias: &str,
    ) -> Result<String, FilterError> {
        match predicate {
            Predicate::Compare { column, op, value } => {
                let col = column_sql(column, alias);
                self.params.push(value.clone());
                Ok(format!("{} {} ?", col, op.as_sql()))
            }
            Predicate::InList {
                column,
                values,
                negated,
            } => {
                let col = column_sql(column, alias);
                let placeholders = vec!["?"; values.len()].join(", ");
                self.params.extend(values.iter().cloned());
                let not = if *negated { "NOT " } else { "" };
                Ok(format!("{} {}IN ({})", col, not, placeholders))
            }
            Predicate::Like {
                column,
                pattern,
                negated,
            } => {
                let col = column_sql(column, alias);
                self.params.push(SqlValue::Text(pattern.clone()));
                let not = if *negated { "NOT " } else { "" };
                Ok(format!("{} {}LIKE ? ESCAPE '\\'", col, not))
            }
            Predicate::IsNull {
                column,
                negated,
                sentinel,
            } => {
                let col = column_sql(column, alias);
                Ok(match (sentinel, negated) {
                    (None, false) => format!("{} IS NULL", col),
                    (None, true) => format!("{} IS NOT NULL", col),
                    (Some(value), false) => {
                        self.params.push(value.clone());
                        format!("({} IS NULL OR {} = ?)", col, col)
                    }
                    (Some(value), true) => {
                        self.params.push(value.clone());
                        format!("({} IS NOT NULL AND {} <> ?)", col, col)
                    }
                })
            }
            Predicate::And(items) => self.render_group(items, " AND ", "1=1", table, alias),
            Predicate::Or(items) => self.render_group(items, " OR ", "1=0", table, alias),
            Predicate::Exists {
                relation,
                predicate,
            } => self.render_exists(relation, predicate, table, alias, false),
            Predicate::NotExists {
                relation,
                predicate,
            } => self.render_exists(relation, predicate, table, alias, true),
        }
    }

    fn render_group(
        &mut self,
        items: &[Predicate],
        joiner: &str,
        empty: &str,
        table: &str,
        alias: &str,
    ) -> Result<String, FilterError> {
        if items.is_empty() {
            return Ok(empty.to_string());
        }
        let parts = items
            .iter()
            .map(|item| self.render(item, table, alias))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("({})", parts.join(joiner)))
    }

    fn render_exists(
        &mut self,
        relation: &str,
        inner: &Predicate,
        table: &str,
        alias: &str,
        negated: bool,
    ) -> Result<String, FilterError> {
        let rel = self
            .catalog
            .relation(table, relation)
            .ok_or_else(|| FilterError::UnknownRelation {
                relation: relation.to_string(),
                table: table.to_string(),
            })?;
        let sub_alias = format!("r{}", self.next_alias);
        self.next_alias += 1;

        let body = self.render(inner, &rel.target_table, &sub_alias)?;
        let not = if negated { "NOT " } else { "" };
        Ok(format!(
            "{}EXISTS (SELECT 1 FROM {} AS {} WHERE {}.{} = {}.{} AND {})",
            not,
            quote_ident(&rel.target_table),
            sub_alias,
            sub_alias,
            quote_ident(&rel.foreign_key),
            alias,
            quote_ident(&rel.local_key),
            body
        ))
    }
}

fn column_sql(column: &Column, alias: &str) -> String {
    let qualified = format!("{}.{}", alias, quote_ident(&column.name));
    if column.day {
        format!("date({})", qualified)
    } else {
        qualified
    }
}

//! Query handle extended by the compiler

use super::error::FilterError;
use super::predicate::Predicate;

/// Query under construction that compiled filters are AND-ed onto.
///
/// `add_predicate` must be all-or-nothing: on error the target is left
/// exactly as it was.
pub trait QueryTarget {
    /// Column reference for `name` on the root entity
    fn qualify_column(&self, name: &str) -> String;

    /// AND a predicate onto the query
    fn add_predicate(&mut self, predicate: Predicate) -> Result<(), FilterError>;

    /// AND "some row reachable through `chain` satisfies `sub`"
    fn add_exists(&mut self, chain: &[String], sub: Predicate) -> Result<(), FilterError> {
        self.add_predicate(Predicate::exists_through(chain, sub))
    }

    /// AND "no row reachable through `chain` satisfies `sub`"
    fn add_not_exists(&mut self, chain: &[String], sub: Predicate) -> Result<(), FilterError> {
        self.add_predicate(Predicate::not_exists_through(chain, sub))
    }
}

/// Target that only records predicates; used where no SQL is needed
#[derive(Debug, Default)]
pub struct PredicateCollector {
    pub predicates: Vec<Predicate>,
}

impl PredicateCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected predicates as one conjunction, `None` when empty
    pub fn into_predicate(self) -> Option<Predicate> {
        if self.predicates.is_empty() {
            None
        } else {
            Some(Predicate::and(self.predicates))
        }
    }
}

impl QueryTarget for PredicateCollector {
    fn qualify_column(&self, name: &str) -> String {
        name.to_string()
    }

    fn add_predicate(&mut self, predicate: Predicate) -> Result<(), FilterError> {
        self.predicates.push(predicate);
        Ok(())
    }
}

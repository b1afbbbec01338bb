//! Predicate tree produced by the compiler
//!
//! Backend-neutral: columns are unqualified leaf names, relations are
//! relation names. A `QueryTarget` decides how to qualify and render them.

use std::fmt;

/// Typed value bound as a query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{}'", s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Real(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Column reference within the current relation scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Compare the calendar day of the stored value only
    pub day: bool,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            day: false,
        }
    }

    pub fn day(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            day: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: Column,
        op: CompareOp,
        value: SqlValue,
    },
    /// Membership; `negated` renders NOT IN
    InList {
        column: Column,
        values: Vec<SqlValue>,
        negated: bool,
    },
    /// LIKE with an already escaped pattern (`\` escape character)
    Like {
        column: Column,
        pattern: String,
        negated: bool,
    },
    /// Null check; `sentinel` is a legacy stored value treated as NULL
    IsNull {
        column: Column,
        negated: bool,
        sentinel: Option<SqlValue>,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// At least one row of `relation` satisfies the inner predicate
    Exists {
        relation: String,
        predicate: Box<Predicate>,
    },
    /// No row of `relation` satisfies the inner predicate
    NotExists {
        relation: String,
        predicate: Box<Predicate>,
    },
}

impl Predicate {
    /// AND of the given predicates, collapsing a single element
    pub fn and(mut predicates: Vec<Predicate>) -> Self {
        if predicates.len() == 1 {
            predicates.remove(0)
        } else {
            Self::And(predicates)
        }
    }

    /// OR of the given predicates, collapsing a single element
    pub fn or(mut predicates: Vec<Predicate>) -> Self {
        if predicates.len() == 1 {
            predicates.remove(0)
        } else {
            Self::Or(predicates)
        }
    }

    /// Nest `leaf` inside one existence scope per relation, outermost first
    pub fn exists_through(chain: &[String], leaf: Predicate) -> Self {
        chain.iter().rev().fold(leaf, |inner, relation| Self::Exists {
            relation: relation.clone(),
            predicate: Box::new(inner),
        })
    }

    /// No row reachable through `chain` satisfies `leaf`.
    ///
    /// Only the outermost hop is negated; inner hops stay existential.
    pub fn not_exists_through(chain: &[String], leaf: Predicate) -> Self {
        match chain.split_first() {
            Some((first, rest)) => Self::NotExists {
                relation: first.clone(),
                predicate: Box::new(Self::exists_through(rest, leaf)),
            },
            None => leaf,
        }
    }
}

//! Dotted filter path resolution

use std::fmt;

/// Relation chain plus leaf column for a filter path.
///
/// `customer.country` resolves to relation `customer`, column `country`;
/// a path without dots targets a column on the queried entity itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    pub relation_chain: Vec<String>,
    pub leaf_column: String,
}

impl PropertyPath {
    /// Split a dotted path. Pure; performs no identifier validation.
    pub fn parse(path: &str) -> Self {
        let mut segments: Vec<String> = path.split('.').map(str::to_string).collect();
        // split always yields at least one segment
        let leaf_column = segments.pop().unwrap_or_default();
        Self {
            relation_chain: segments,
            leaf_column,
        }
    }

    /// Split a dotted path, rejecting empty or non-identifier segments.
    pub fn parse_strict(path: &str) -> Result<Self, String> {
        if let Some(bad) = path.split('.').find(|s| !is_identifier(s)) {
            return Err(if bad.is_empty() {
                format!("Path '{}' contains an empty segment", path)
            } else {
                format!("Path segment '{}' in '{}' is not a valid identifier", bad, path)
            });
        }
        Ok(Self::parse(path))
    }

    pub fn is_local(&self) -> bool {
        self.relation_chain.is_empty()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for relation in &self.relation_chain {
            write!(f, "{}.", relation)?;
        }
        f.write_str(&self.leaf_column)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_column() {
        let path = PropertyPath::parse("total_amount");
        assert!(path.is_local());
        assert_eq!(path.leaf_column, "total_amount");
    }

    #[test]
    fn single_relation() {
        let path = PropertyPath::parse("customer.country");
        assert_eq!(path.relation_chain, vec!["customer"]);
        assert_eq!(path.leaf_column, "country");
        assert!(!path.is_local());
    }

    #[test]
    fn multi_hop() {
        let path = PropertyPath::parse("lineItems.product.category");
        assert_eq!(path.relation_chain, vec!["lineItems", "product"]);
        assert_eq!(path.leaf_column, "category");
        assert_eq!(path.to_string(), "lineItems.product.category");
    }

    #[test]
    fn strict_rejects_empty_segments() {
        assert!(PropertyPath::parse_strict("customer..country").is_err());
        assert!(PropertyPath::parse_strict(".country").is_err());
        assert!(PropertyPath::parse_strict("").is_err());
    }

    #[test]
    fn strict_rejects_non_identifiers() {
        let err = PropertyPath::parse_strict("customer.country; DROP").unwrap_err();
        assert!(err.contains("not a valid identifier"));
        assert!(PropertyPath::parse_strict("1abc").is_err());
        assert!(PropertyPath::parse_strict("line_items.product_name").is_ok());
    }
}

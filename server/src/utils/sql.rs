//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Patterns built from the result must be rendered with `ESCAPE '\'`.
///
/// # Example
///
/// ```
/// use relquery_server::utils::sql::escape_like_pattern;
///
/// let pattern = format!("%{}%", escape_like_pattern("100% match_test"));
/// assert_eq!(pattern, "%100\\% match\\_test%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Where the literal must appear in the matched text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAnchor {
    Anywhere,
    Start,
    End,
}

/// Build an escaped LIKE pattern for a literal substring match
pub fn like_pattern(literal: &str, anchor: LikeAnchor) -> String {
    let escaped = escape_like_pattern(literal);
    match anchor {
        LikeAnchor::Anywhere => format!("%{}%", escaped),
        LikeAnchor::Start => format!("{}%", escaped),
        LikeAnchor::End => format!("%{}", escaped),
    }
}

/// Quote an identifier for SQLite
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern_no_special_chars() {
        assert_eq!(escape_like_pattern("widget"), "widget");
    }

    #[test]
    fn test_escape_like_pattern_metacharacters() {
        assert_eq!(escape_like_pattern("10%"), "10\\%");
        assert_eq!(escape_like_pattern("INV_001"), "INV\\_001");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_like_pattern_anchors() {
        assert_eq!(like_pattern("INV", LikeAnchor::Start), "INV%");
        assert_eq!(like_pattern("001", LikeAnchor::End), "%001");
        assert_eq!(like_pattern("x_y", LikeAnchor::Anywhere), "%x\\_y%");
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("invoices"), "\"invoices\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}

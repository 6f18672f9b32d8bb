//! Keyword categorization of headlines.

use crate::config::CategoryRule;

/// Label of items no keyword matched.
pub const GENERAL: &str = "general";

/// First category in `table` with a keyword contained in `title`, else [`GENERAL`].
pub fn categorize<'a>(title: &str, table: &'a [CategoryRule]) -> &'a str {
    table
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| !k.is_empty() && title.contains(k.as_str())))
        .map_or(GENERAL, |rule| rule.label.as_str())
}

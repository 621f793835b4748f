//! Identifier-safety helpers.
//!
//! The filter/sort/select compilers never interpolate a JSON-supplied
//! value as an identifier, every identifier in compiled output comes
//! from a `Field.column` or `Field.name` already present in the field
//! catalogue. These are host-facing toolkit helpers, not wired into the
//! schema walker or compilers: for hosts validating their own
//! `column=`/`name=` tag overrides, or wanting to additionally quote the
//! compiled output themselves.

/// Wrap an identifier in double quotes, escaping embedded quotes.
///
/// # Examples
///
/// ```
/// use rql_sql::escape_ident;
///
/// assert_eq!(escape_ident("users"), "\"users\"");
/// assert_eq!(escape_ident("user\"name"), "\"user\"\"name\"");
/// ```
pub fn escape_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a literal string for contexts that cannot take a placeholder
/// (e.g. `SET` statements). Prefer `SqlParam` wherever possible.
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Check whether a string is a valid unquoted SQL identifier: starts
/// with a letter or underscore, followed by letters, digits, underscores.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check whether a string is a reserved SQL keyword, case-insensitively.
///
/// A host-facing helper: a host building its own model description can
/// call this against a `column=`/`name=` tag override before handing it
/// to the schema walker, to warn (not reject) when the override shadows
/// a keyword. Not called from anywhere in this crate.
pub fn is_keyword(s: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "all", "and", "any", "as", "asc", "between", "by", "case", "cast",
        "check", "column", "constraint", "create", "cross", "current",
        "default", "delete", "desc", "distinct", "drop", "else", "end",
        "exists", "false", "for", "foreign", "from", "full", "group",
        "having", "in", "index", "inner", "insert", "into", "is", "join",
        "key", "left", "like", "limit", "not", "null", "offset", "on",
        "or", "order", "outer", "primary", "references", "right",
        "select", "set", "table", "then", "to", "true", "union",
        "unique", "update", "using", "values", "when", "where", "with",
    ];
    KEYWORDS.contains(&s.to_lowercase().as_str())
}

//! Placeholder-aware SQL fragment building.
//!
//! This is the core type the filter compiler lowers onto: it tracks a SQL
//! string together with the ordered argument list its placeholders refer
//! to, so the two can never drift apart.

use crate::param::SqlParam;
use std::fmt::Write;

/// How a fragment renders its placeholders.
///
/// `Positional` numbers each placeholder (`$1`, `$2`, ...) so that
/// fragments built independently can be joined and renumbered to form a
/// single, continuous argument list. `Fixed` always emits the same token
/// (`?`, or a host-chosen symbol) and never renumbers, the argument's
/// position in `filter_args` is its only identity.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaceholderStyle {
    Positional { symbol: String },
    Fixed { symbol: String },
}

impl PlaceholderStyle {
    pub fn fixed(symbol: impl Into<String>) -> Self {
        Self::Fixed { symbol: symbol.into() }
    }

    pub fn positional(symbol: impl Into<String>) -> Self {
        Self::Positional { symbol: symbol.into() }
    }
}

/// A SQL fragment with its associated parameters.
///
/// Maintains a SQL string with parameter placeholders and a parallel
/// vector of parameter values. Fragments compose via [`SqlFragment::append`]
/// and [`SqlFragment::join`], which renumber positional placeholders so
/// that sub-expressions (e.g. the children of a `$or`) can be lowered in
/// isolation and then combined.
#[derive(Clone, Debug)]
pub struct SqlFragment {
    sql: String,
    params: Vec<SqlParam>,
    style: PlaceholderStyle,
}

impl SqlFragment {
    /// Create a new empty fragment using the given placeholder style.
    pub fn new(style: PlaceholderStyle) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            style,
        }
    }

    /// Create a fragment from raw SQL with no parameters.
    ///
    /// Only use this for known-safe text (keywords, column names already
    /// validated against the field catalogue). Never use it with
    /// user-controlled values.
    pub fn raw(style: PlaceholderStyle, sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            style,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<SqlParam>) {
        (self.sql, self.params)
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Push a parameter and its placeholder, per the fragment's style.
    pub fn push_param(&mut self, value: impl Into<SqlParam>) -> &mut Self {
        let placeholder = self.next_placeholder();
        self.sql.push_str(&placeholder);
        self.params.push(value.into());
        self
    }

    /// The placeholder text a call to [`Self::push_param`] would emit
    /// right now, without emitting or binding anything. Lets a caller
    /// splice the placeholder into custom-rendered text (e.g. a
    /// [`crate`]-external operator renderer) before recording the
    /// argument with [`Self::push_value`].
    pub fn next_placeholder(&self) -> String {
        match &self.style {
            PlaceholderStyle::Positional { symbol } => format!("{}{}", symbol, self.params.len() + 1),
            PlaceholderStyle::Fixed { symbol } => symbol.clone(),
        }
    }

    /// Record an argument without emitting placeholder text. The
    /// caller must already have pushed text containing the placeholder
    /// `next_placeholder` returned, via [`Self::push`].
    pub fn push_value(&mut self, value: impl Into<SqlParam>) -> &mut Self {
        self.params.push(value.into());
        self
    }

    /// Append another fragment built with the same style, renumbering its
    /// positional placeholders to continue from this fragment's count.
    pub fn append(&mut self, other: SqlFragment) -> &mut Self {
        let offset = self.params.len();
        match &self.style {
            PlaceholderStyle::Positional { symbol } => {
                self.sql.push_str(&renumber(&other.sql, symbol, offset));
            }
            PlaceholderStyle::Fixed { .. } => {
                self.sql.push_str(&other.sql);
            }
        }
        self.params.extend(other.params);
        self
    }

    /// Join fragments with a separator, skipping empty ones.
    pub fn join(style: PlaceholderStyle, sep: &str, fragments: impl IntoIterator<Item = SqlFragment>) -> Self {
        let mut result = Self::new(style);
        let mut first = true;
        for frag in fragments {
            if frag.is_empty() && frag.params.is_empty() {
                continue;
            }
            if !first {
                result.push(sep);
            }
            result.append(frag);
            first = false;
        }
        result
    }

    /// Wrap the fragment's SQL in parentheses.
    pub fn parens(mut self) -> Self {
        self.sql = format!("({})", self.sql);
        self
    }

    /// Count how many placeholders this fragment's SQL text contains.
    ///
    /// For `Fixed` styles this is just the number of occurrences of the
    /// symbol; for `Positional` styles it is the number of distinct
    /// `<symbol><digits>` occurrences. Used by tests to check the
    /// placeholder-count/argument-count invariant.
    pub fn placeholder_count(&self) -> usize {
        match &self.style {
            PlaceholderStyle::Fixed { symbol } => {
                if symbol.is_empty() {
                    0
                } else {
                    self.sql.matches(symbol.as_str()).count()
                }
            }
            PlaceholderStyle::Positional { symbol } => {
                let mut count = 0;
                let mut rest = self.sql.as_str();
                while let Some(idx) = rest.find(symbol.as_str()) {
                    let after = &rest[idx + symbol.len()..];
                    if after.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                        count += 1;
                    }
                    rest = &rest[idx + symbol.len()..];
                }
                count
            }
        }
    }
}

/// Rewrite `<symbol><N>` occurrences in `sql`, shifting `N` by `offset`.
fn renumber(sql: &str, symbol: &str, offset: usize) -> String {
    if offset == 0 || symbol.is_empty() {
        return sql.to_string();
    }

    let mut result = String::with_capacity(sql.len());
    let mut rest = sql;

    while let Some(idx) = rest.find(symbol) {
        result.push_str(&rest[..idx]);
        let after = &rest[idx + symbol.len()..];

        let digits_len = after.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits_len == 0 {
            result.push_str(symbol);
            rest = after;
            continue;
        }

        let num: usize = after[..digits_len].parse().unwrap();
        write!(result, "{}{}", symbol, num + offset).unwrap();
        rest = &after[digits_len..];
    }
    result.push_str(rest);
    result
}

//! The facade's output type (§3 Data Model).

use rql_sql::SqlParam;

/// Result of a successful `Parse` call. Each call allocates a fresh
/// `Params`; the field catalogue that produced it is untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub limit: i64,
    pub offset: i64,
    /// SQL filter expression with placeholders, ready to splice after a
    /// `WHERE`.
    pub filter_exp: String,
    /// Arguments in placeholder order; the Nth placeholder pairs with
    /// `filter_args[N-1]`.
    pub filter_args: Vec<SqlParam>,
    pub sort: String,
    pub select: String,
    /// Echoed from config, so the host knows how to bind `filter_args`.
    pub param_symbol: String,
    pub positional_params: bool,
}

impl Params {
    /// Count of placeholder occurrences in `filter_exp`. Used by tests
    /// to check the `count_of_placeholders(filter_exp) == len(filter_args)`
    /// invariant without depending on `rql_sql`'s internal fragment type.
    pub fn placeholder_count(&self) -> usize {
        if self.param_symbol.is_empty() {
            return 0;
        }
        if self.positional_params {
            let mut count = 0;
            let mut rest = self.filter_exp.as_str();
            while let Some(idx) = rest.find(self.param_symbol.as_str()) {
                let after = &rest[idx + self.param_symbol.len()..];
                if after.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                    count += 1;
                }
                rest = after;
            }
            count
        } else {
            self.filter_exp.matches(self.param_symbol.as_str()).count()
        }
    }
}

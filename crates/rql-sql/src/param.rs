//! SQL parameter values.

use chrono::{DateTime, FixedOffset};

/// A value bound to a placeholder in a compiled filter expression.
///
/// Mirrors the JSON-value-to-SQL-argument conversion performed by the
/// type binder: the dynamic type always matches the scalar kind declared
/// for the field the value was validated against.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// Unsigned 64-bit integer.
    UInt(u64),
    /// 64-bit float.
    Float(f64),
    Text(String),
    /// A parsed instant, carrying the offset recovered from its source layout.
    Time(DateTime<FixedOffset>),
}

impl SqlParam {
    /// Name of the scalar kind this value was bound against, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed int",
            Self::UInt(_) => "unsigned int",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
            Self::Time(_) => "time",
        }
    }
}

impl From<bool> for SqlParam {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for SqlParam {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u64> for SqlParam {
    fn from(n: u64) -> Self {
        Self::UInt(n)
    }
}

impl From<f64> for SqlParam {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<DateTime<FixedOffset>> for SqlParam {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Self::Time(t)
    }
}

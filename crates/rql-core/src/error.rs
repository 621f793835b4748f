//! Error taxonomy: schema (construction-time), syntax and semantic
//! (both parse-time). Mirrors the structured, per-variant `#[error(...)]`
//! messages of `postrust_core::Error`, minus anything HTTP-shaped, since
//! there is no transport layer in this crate, so there is no `status_code()`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification a caller can map onto its own status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    Syntax,
    Semantic,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Schema(_) => ErrorKind::Schema,
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::Semantic(_) => ErrorKind::Semantic,
        }
    }
}

/// Construction-time errors: something about the model or config is wrong.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("field `{field}` has an unsupported declared kind")]
    UnsupportedKind { field: String },

    #[error("duplicate query name `{name}`")]
    DuplicateField { name: String },

    #[error("`layout` option set on non-time field `{field}`")]
    LayoutOnNonTime { field: String },

    #[error("field `{field}` declares an invalid layout `{layout}`")]
    InvalidLayout { field: String, layout: String },

    #[error("root model description must be a record")]
    NonRecordRoot,

    #[error(
        "renderer produced an unknown operator token for field `{field}`, operator `{op:?}`, with no fallback"
    )]
    UnknownRendererOperator { field: String, op: String },
}

/// Parse-time errors: the JSON document's shape is wrong.
#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("input of {len} bytes exceeds the configured maximum of {max} bytes")]
    InputTooLarge { len: usize, max: usize },

    #[error("unknown top-level key `{0}`")]
    UnknownTopLevelKey(String),

    #[error("`{connective}` requires a non-empty array of filter nodes")]
    EmptyOrInvalidConnective { connective: String },

    #[error("`{key}` is not a recognised operator here")]
    UnknownOperatorKey { key: String },

    #[error("`{key}` in a predicate object must be an operator, not a nested object")]
    OperatorOutsidePredicate { key: String },

    #[error("`limit` must be an integer")]
    LimitNotInteger,

    #[error("`offset` must be an integer")]
    OffsetNotInteger,

    #[error("`sort` must be an array of strings")]
    SortNotStringArray,

    #[error("`select` must be an array of strings")]
    SelectNotStringArray,

    #[error("`filter` must be a JSON object")]
    FilterNotObject,
}

/// Parse-time errors: the document is well-formed JSON but violates the
/// catalogue (unknown field, disallowed operator, bad value, ...).
#[derive(Error, Debug)]
pub enum SemanticError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{field}` is not filterable")]
    NotFilterable { field: String },

    #[error("field `{field}` is not sortable")]
    NotSortable { field: String },

    #[error("operator `{op}` is not permitted for field `{field}` (kind {kind})")]
    OperatorNotAllowed {
        field: String,
        op: String,
        kind: String,
    },

    #[error("invalid value for field `{field}`: {reason} (value: {value})")]
    InvalidValue {
        field: String,
        reason: String,
        value: String,
    },

    #[error("limit must be positive")]
    InvalidLimit,

    #[error("limit {limit} exceeds maximum {max}")]
    LimitExceedsMax { limit: i64, max: i64 },

    #[error("offset must be non-negative")]
    InvalidOffset,
}

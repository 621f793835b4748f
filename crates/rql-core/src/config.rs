//! Parser configuration (C4).
//!
//! Mirrors `postrust_core::config::AppConfig`'s shape (a plain struct
//! with a `Default` impl and per-field default functions), minus the
//! `from_env` loading path: building a `RqlParser` is a construction-time
//! concern of the embedding host, not a deployable service, so there is
//! no environment-variable layer here.

use std::fmt;
use std::sync::Arc;

use crate::kind::Operator;
use crate::naming::camel_to_snake;

/// Sort direction, passed to a [`DirRenderer`] override.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Renders an operator into its SQL token, column reference and
/// placeholder into one predicate string. The "cleaner design" named in
/// the design notes as an alternative to a `(op_text, fmt)` callback
/// pair: a trait object composes the same way `postrust_sql::SqlBuilder`
/// lets callers swap rendering strategies.
pub trait Renderer: Send + Sync {
    fn render(&self, op: Operator, column: &str, placeholder: &str) -> String;
}

/// `"<col> <op_tok> <ph>"`, using the fixed `= <> < <= > >= LIKE` table.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRenderer;

impl Renderer for DefaultRenderer {
    fn render(&self, op: Operator, column: &str, placeholder: &str) -> String {
        format!("{column} {} {placeholder}", op.sql_token())
    }
}

/// Renders a sort direction into its SQL suffix.
pub trait DirRenderer: Send + Sync {
    fn render(&self, dir: Direction) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultDirRenderer;

impl DirRenderer for DefaultDirRenderer {
    fn render(&self, dir: Direction) -> String {
        match dir {
            Direction::Asc => "asc".to_string(),
            Direction::Desc => "desc".to_string(),
        }
    }
}

/// An identifier normaliser: declared field name → query-side segment.
pub type NameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Construction-time diagnostic sink. Never invoked from `Parse`.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

fn default_name_fn() -> NameFn {
    Arc::new(camel_to_snake)
}

fn default_field_sep() -> String {
    "_".to_string()
}

fn default_op_prefix() -> String {
    "$".to_string()
}

fn default_limit() -> i64 {
    25
}

fn default_param_symbol() -> String {
    "?".to_string()
}

fn default_max_input_bytes() -> usize {
    1 << 20
}

/// Options the embedding host configures the parser with. See the
/// external-interfaces table for the semantics of each field.
#[derive(Clone)]
pub struct ParserConfig {
    pub field_sep: String,
    pub op_prefix: String,
    pub default_limit: i64,
    pub limit_max_value: i64,
    pub default_sort: Vec<String>,
    pub name_fn: NameFn,
    pub param_symbol: String,
    pub positional_params: bool,
    pub renderer: Arc<dyn Renderer>,
    pub dir_renderer: Arc<dyn DirRenderer>,
    pub log: Option<LogSink>,
    /// Ceiling on the raw byte length of a document passed to `parse`, the
    /// host-configurable bound named in the concurrency & resource model
    /// ("implementations should reject inputs larger than an
    /// implementation-chosen ceiling"). `0` disables the check, matching
    /// the `limit_max_value` "0 means no bound" convention.
    pub max_input_bytes: usize,
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("field_sep", &self.field_sep)
            .field("op_prefix", &self.op_prefix)
            .field("default_limit", &self.default_limit)
            .field("limit_max_value", &self.limit_max_value)
            .field("default_sort", &self.default_sort)
            .field("param_symbol", &self.param_symbol)
            .field("positional_params", &self.positional_params)
            .field("max_input_bytes", &self.max_input_bytes)
            .finish_non_exhaustive()
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            field_sep: default_field_sep(),
            op_prefix: default_op_prefix(),
            default_limit: default_limit(),
            limit_max_value: 0,
            default_sort: Vec::new(),
            name_fn: default_name_fn(),
            param_symbol: default_param_symbol(),
            positional_params: false,
            renderer: Arc::new(DefaultRenderer),
            dir_renderer: Arc::new(DefaultDirRenderer),
            log: None,
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_sep(mut self, sep: impl Into<String>) -> Self {
        self.field_sep = sep.into();
        self
    }

    pub fn op_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.op_prefix = prefix.into();
        self
    }

    pub fn default_limit(mut self, limit: i64) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn limit_max_value(mut self, max: i64) -> Self {
        self.limit_max_value = max;
        self
    }

    pub fn default_sort(mut self, sort: Vec<String>) -> Self {
        self.default_sort = sort;
        self
    }

    pub fn name_fn(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.name_fn = Arc::new(f);
        self
    }

    pub fn param_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.param_symbol = symbol.into();
        self
    }

    pub fn positional_params(mut self, positional: bool) -> Self {
        self.positional_params = positional;
        self
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    pub fn dir_renderer(mut self, renderer: impl DirRenderer + 'static) -> Self {
        self.dir_renderer = Arc::new(renderer);
        self
    }

    pub fn log(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.log = Some(Arc::new(sink));
        self
    }

    pub fn max_input_bytes(mut self, max: usize) -> Self {
        self.max_input_bytes = max;
        self
    }

    pub(crate) fn emit_log(&self, message: &str) {
        if let Some(sink) = &self.log {
            sink(message);
        }
        tracing::debug!(target: "rql_core", "{message}");
    }
}

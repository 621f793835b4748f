//! A type-directed compiler from a JSON resource query to a
//! parameterised SQL filter expression, sort clause, projection list and
//! limit/offset, without ever evaluating SQL or connecting to a
//! database itself.
//!
//! Construction walks a host-supplied [`schema::ModelDecl`] into a
//! [`field::FieldCatalogue`]; [`parser::RqlParser::parse`] then compiles
//! one JSON document against that catalogue per call. See each module
//! for its piece of the pipeline.

pub mod config;
pub mod error;
pub mod field;
pub mod filter;
pub mod kind;
pub mod naming;
pub mod params;
pub mod parser;
pub mod query;
pub mod schema;

pub use config::{DefaultDirRenderer, DefaultRenderer, DirRenderer, Direction, ParserConfig, Renderer};
pub use error::{Error, ErrorKind, Result, SchemaError, SemanticError, SyntaxError};
pub use field::{Field, FieldCatalogue, FieldMeta};
pub use kind::{Kind, Layout, Operator, Preset};
pub use params::Params;
pub use parser::RqlParser;
pub use schema::{FieldDecl, FieldNode, FieldSpec, ModelDecl};

/// Common imports for embedding hosts.
pub mod prelude {
    pub use crate::{
        Error, ErrorKind, Field, FieldCatalogue, FieldDecl, FieldMeta, FieldNode, FieldSpec, Kind,
        ModelDecl, Operator, Params, ParserConfig, Renderer, RqlParser,
    };
}

//! Field metadata and the field catalogue (§3 of the data model).

use std::collections::HashMap;

use rql_sql::SqlParam;
use serde_json::Value;

use crate::error::SemanticError;
use crate::kind::{self, Kind, Layout, Operator};

/// Public descriptor for a queryable field, as returned by catalogue
/// introspection. Cheap to clone; the catalogue itself owns the
/// authoritative copy.
#[derive(Clone, Debug, serde::Serialize)]
pub struct FieldMeta {
    /// Fully-qualified query-side name, e.g. `address.zip.code`.
    pub name: String,
    /// Backing SQL column expression, e.g. `address_zip_code`.
    pub column: String,
    pub sortable: bool,
    pub filterable: bool,
    pub kind: Kind,
    /// Only meaningful for `Kind::Time`.
    pub layout: Option<Layout>,
    pub allowed_ops: Vec<Operator>,
}

/// Internal field record: `FieldMeta` plus the validate/convert behaviour
/// bound to its kind and layout.
#[derive(Clone, Debug)]
pub struct Field {
    pub meta: FieldMeta,
}

impl Field {
    pub fn validate(&self, value: &Value) -> std::result::Result<(), SemanticError> {
        kind::validate(self.meta.kind, self.meta.layout.as_ref(), value).map_err(|reason| {
            SemanticError::InvalidValue {
                field: self.meta.name.clone(),
                reason,
                value: serde_json::to_string(value).unwrap_or_else(|_| "<unserialisable>".to_string()),
            }
        })
    }

    pub fn convert(&self, value: &Value) -> SqlParam {
        kind::convert(self.meta.kind, self.meta.layout.as_ref(), value)
    }

    pub fn validate_and_convert(&self, value: &Value) -> std::result::Result<SqlParam, SemanticError> {
        self.validate(value)?;
        Ok(self.convert(value))
    }

    pub fn allows(&self, op: Operator) -> bool {
        self.meta.allowed_ops.contains(&op)
    }
}

/// Mapping from fully-qualified query name to `Field`, built once at
/// parser construction and read-only thereafter.
#[derive(Clone, Debug, Default)]
pub struct FieldCatalogue {
    fields: HashMap<String, Field>,
}

impl FieldCatalogue {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter()
    }

    /// Insert a field, failing with `None` (caller raises `DuplicateField`)
    /// if the query name is already taken.
    pub(crate) fn insert(&mut self, field: Field) -> std::result::Result<(), Field> {
        if self.fields.contains_key(&field.meta.name) {
            return Err(field);
        }
        self.fields.insert(field.meta.name.clone(), field);
        Ok(())
    }
}

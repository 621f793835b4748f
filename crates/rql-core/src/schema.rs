//! Model description and the schema walker (C3).
//!
//! Rust has no runtime struct-tag reflection, so the host hands the
//! walker a hand-assembled description of its record shape instead of a
//! native struct the walker could introspect. `ModelDecl` is the
//! recursive value that description takes: the same shape a reflective
//! walker would derive by enumerating struct fields and reading their
//! `rql:"..."` tags, just written out by hand (or via the `model!` macro
//! below). Everything downstream of `build_catalogue` is identical to a
//! reflective implementation.

use crate::config::ParserConfig;
use crate::error::SchemaError;
use crate::field::{Field, FieldCatalogue, FieldMeta};
use crate::kind::{Kind, Layout};

/// A record description: an ordered list of fields, each a leaf or a
/// nested/embedded record.
#[derive(Clone, Debug, Default)]
pub struct ModelDecl {
    pub fields: Vec<FieldSpec>,
}

impl ModelDecl {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }
}

/// One named entry in a [`ModelDecl`].
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub field_name: String,
    /// An anonymous/embedded record contributes no name prefix; its
    /// children are flattened into the parent's namespace.
    pub anonymous: bool,
    pub node: FieldNode,
}

#[derive(Clone, Debug)]
pub enum FieldNode {
    Leaf(FieldDecl),
    Nested(ModelDecl),
}

impl FieldSpec {
    pub fn leaf(field_name: impl Into<String>, kind: Kind, tag: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            anonymous: false,
            node: FieldNode::Leaf(FieldDecl {
                kind,
                nullable: false,
                tag: tag.into(),
            }),
        }
    }

    pub fn nullable_leaf(field_name: impl Into<String>, kind: Kind, tag: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            anonymous: false,
            node: FieldNode::Leaf(FieldDecl {
                kind,
                nullable: true,
                tag: tag.into(),
            }),
        }
    }

    pub fn nested(field_name: impl Into<String>, model: ModelDecl) -> Self {
        Self {
            field_name: field_name.into(),
            anonymous: false,
            node: FieldNode::Nested(model),
        }
    }

    /// An embedded/anonymous record: its fields flatten into the parent
    /// with no prefix contributed by this spec's own name.
    pub fn embedded(model: ModelDecl) -> Self {
        Self {
            field_name: String::new(),
            anonymous: true,
            node: FieldNode::Nested(model),
        }
    }
}

/// Declared kind and raw tag string for a leaf field.
///
/// `nullable` mirrors a `*string`/`sql.NullString`-style wrapper: the
/// walker accepts it without altering `kind` (the nullable-collapse
/// behaviour, §4.3), it exists purely as host-side documentation.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub kind: Kind,
    pub nullable: bool,
    pub tag: String,
}

#[derive(Clone, Debug, Default)]
struct TagOptions {
    filter: bool,
    sort: bool,
    column: Option<String>,
    name: Option<String>,
    layout: Option<String>,
}

fn parse_tag(tag: &str) -> TagOptions {
    let mut opts = TagOptions::default();
    for part in tag.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if part == "filter" {
            opts.filter = true;
        } else if part == "sort" {
            opts.sort = true;
        } else if let Some(rest) = part.strip_prefix("column=") {
            opts.column = Some(rest.to_string());
        } else if let Some(rest) = part.strip_prefix("name=") {
            opts.name = Some(rest.to_string());
        } else if let Some(rest) = part.strip_prefix("layout=") {
            opts.layout = Some(rest.to_string());
        }
        // Unknown options are silently ignored, per §4.3.
    }
    opts
}

/// Walk `model` and build its field catalogue.
pub fn build_catalogue(
    model: &ModelDecl,
    config: &ParserConfig,
) -> std::result::Result<FieldCatalogue, SchemaError> {
    let mut catalogue = FieldCatalogue::new();
    walk(model, &[], &mut catalogue, config)?;
    Ok(catalogue)
}

fn walk(
    model: &ModelDecl,
    prefix: &[String],
    catalogue: &mut FieldCatalogue,
    config: &ParserConfig,
) -> std::result::Result<(), SchemaError> {
    for spec in &model.fields {
        match &spec.node {
            FieldNode::Nested(inner) => {
                let mut child_prefix = prefix.to_vec();
                if !spec.anonymous {
                    child_prefix.push((config.name_fn)(&spec.field_name));
                }
                walk(inner, &child_prefix, catalogue, config)?;
            }
            FieldNode::Leaf(decl) => {
                insert_leaf(spec, decl, prefix, catalogue, config)?;
            }
        }
    }
    Ok(())
}

fn insert_leaf(
    spec: &FieldSpec,
    decl: &FieldDecl,
    prefix: &[String],
    catalogue: &mut FieldCatalogue,
    config: &ParserConfig,
) -> std::result::Result<(), SchemaError> {
    let tag = parse_tag(&decl.tag);

    if tag.layout.is_some() && decl.kind != Kind::Time {
        return Err(SchemaError::LayoutOnNonTime {
            field: spec.field_name.clone(),
        });
    }

    let layout = match decl.kind {
        Kind::Time => Some(
            tag.layout
                .as_deref()
                .map(Layout::parse_tag_value)
                .unwrap_or_default(),
        ),
        _ => None,
    };

    let leaf_segment = tag
        .name
        .clone()
        .unwrap_or_else(|| (config.name_fn)(&spec.field_name));

    let mut segments = prefix.to_vec();
    segments.push(leaf_segment);

    let name = segments.join(&config.field_sep);
    let column = tag.column.clone().unwrap_or_else(|| segments.join("_"));
    let allowed_ops = decl.kind.allowed_ops().to_vec();

    let field = Field {
        meta: FieldMeta {
            name: name.clone(),
            column,
            sortable: tag.sort,
            filterable: tag.filter,
            kind: decl.kind,
            layout,
            allowed_ops,
        },
    };

    config.emit_log(&format!("field catalogued: {name}"));

    catalogue
        .insert(field)
        .map_err(|_| SchemaError::DuplicateField { name })
}

/// Declarative sugar for building a flat [`ModelDecl`] without nesting.
/// Equivalent to calling [`FieldSpec::leaf`] for each entry; nested or
/// embedded records are built directly with the [`ModelDecl`]/[`FieldSpec`]
/// constructors, the macro only covers the common flat case.
#[macro_export]
macro_rules! model {
    ( $( $field:ident : $kind:ident $(, $tag:literal)? ),* $(,)? ) => {{
        let mut fields = Vec::new();
        $(
            fields.push($crate::schema::FieldSpec::leaf(
                stringify!($field),
                $crate::kind::Kind::$kind,
                $crate::model!(@tag $($tag)?),
            ));
        )*
        $crate::schema::ModelDecl::new(fields)
    }};
    (@tag) => { "" };
    (@tag $tag:literal) => { $tag };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    #[test]
    fn test_flat_catalogue() {
        let model = model! {
            age: SignedInt, "filter,sort",
            name: Str, "filter",
        };
        let cat = build_catalogue(&model, &ParserConfig::default()).unwrap();
        assert_eq!(cat.len(), 2);
        let age = cat.get("age").unwrap();
        assert!(age.meta.filterable);
        assert!(age.meta.sortable);
        assert_eq!(age.meta.column, "age");
    }

    #[test]
    fn test_nested_prefix_and_column() {
        let zip = ModelDecl::new(vec![FieldSpec::leaf("Code", Kind::SignedInt, "filter,sort")]);
        let address = ModelDecl::new(vec![
            FieldSpec::leaf("Name", Kind::Str, "filter"),
            FieldSpec::nested("ZIP", zip),
        ]);
        let root = ModelDecl::new(vec![
            FieldSpec::leaf("Age", Kind::SignedInt, "filter"),
            FieldSpec::leaf("Name", Kind::Str, "filter"),
            FieldSpec::nested("Address", address),
        ]);

        let config = ParserConfig::default().field_sep(".");
        let cat = build_catalogue(&root, &config).unwrap();

        let code = cat.get("address.zip.code").unwrap();
        assert_eq!(code.meta.column, "address_zip_code");
        assert!(code.meta.sortable);

        let addr_name = cat.get("address.name").unwrap();
        assert_eq!(addr_name.meta.column, "address_name");
    }

    #[test]
    fn test_name_and_column_override() {
        let model = ModelDecl::new(vec![FieldSpec::leaf(
            "SomeName",
            Kind::Str,
            "filter,name=someName,column=some_name",
        )]);
        let cat = build_catalogue(&model, &ParserConfig::default()).unwrap();
        let field = cat.get("someName").unwrap();
        assert_eq!(field.meta.column, "some_name");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let model = ModelDecl::new(vec![
            FieldSpec::leaf("Age", Kind::SignedInt, "filter"),
            FieldSpec::leaf("age", Kind::SignedInt, "filter"),
        ]);
        let err = build_catalogue(&model, &ParserConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_layout_on_non_time_rejected() {
        let model = ModelDecl::new(vec![FieldSpec::leaf(
            "Age",
            Kind::SignedInt,
            "filter,layout=RFC3339",
        )]);
        let err = build_catalogue(&model, &ParserConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaError::LayoutOnNonTime { .. }));
    }

    #[test]
    fn test_embedded_flattens_no_prefix() {
        let inner = ModelDecl::new(vec![FieldSpec::leaf("Street", Kind::Str, "filter")]);
        let root = ModelDecl::new(vec![FieldSpec::embedded(inner)]);
        let cat = build_catalogue(&root, &ParserConfig::default()).unwrap();
        assert!(cat.get("street").is_some());
    }
}

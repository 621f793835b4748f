//! Filter compiler (C5).
//!
//! Decodes the JSON value of the top-level `filter` key into a tagged
//! tree (connectives and predicates), then lowers that tree into a
//! placeholder-parameterised [`rql_sql::SqlFragment`]. Splitting parsing
//! from lowering this way, rather than walking the raw `serde_json::Map`
//! once and emitting SQL as it goes, makes the semantic checks in §4.4
//! exhaustive by construction: every node of the tree is one of a fixed
//! number of variants, each validated once before any SQL text is built.

use rql_sql::{PlaceholderStyle, SqlFragment};
use serde_json::{Map, Value};

use crate::config::ParserConfig;
use crate::error::{Error, SemanticError, SyntaxError};
use crate::field::FieldCatalogue;
use crate::kind::Operator;

/// A parsed filter sub-document, before semantic validation.
#[derive(Debug)]
enum FilterNode {
    Connective {
        is_or: bool,
        children: Vec<FilterNode>,
    },
    /// A conjunction of entries at one JSON-object level, the implicit
    /// `AND` between sibling keys, distinct from an explicit `$and`.
    Conjunction(Vec<FilterNode>),
    Predicate {
        field: String,
        ops: Vec<(Operator, Value)>,
    },
}

/// Parse the raw JSON object into a [`FilterNode`] tree, recognising the
/// connective keys (`$or`/`$and`, prefix configurable) and predicate
/// shorthand. No catalogue lookups happen here, only shape validation.
fn parse_object(obj: &Map<String, Value>, config: &ParserConfig) -> Result<FilterNode, Error> {
    let or_key = format!("{}or", config.op_prefix);
    let and_key = format!("{}and", config.op_prefix);

    let mut entries = Vec::with_capacity(obj.len());
    for (key, value) in obj {
        if *key == or_key || *key == and_key {
            let is_or = *key == or_key;
            let Value::Array(items) = value else {
                return Err(SyntaxError::EmptyOrInvalidConnective {
                    connective: key.clone(),
                }
                .into());
            };
            if items.is_empty() {
                return Err(SyntaxError::EmptyOrInvalidConnective {
                    connective: key.clone(),
                }
                .into());
            }
            let mut children = Vec::with_capacity(items.len());
            for item in items {
                let Value::Object(child_obj) = item else {
                    return Err(SyntaxError::EmptyOrInvalidConnective {
                        connective: key.clone(),
                    }
                    .into());
                };
                children.push(parse_object(child_obj, config)?);
            }
            entries.push(FilterNode::Connective { is_or, children });
            continue;
        }

        entries.push(parse_predicate(key, value, config)?);
    }

    Ok(FilterNode::Conjunction(entries))
}

fn parse_predicate(field: &str, value: &Value, config: &ParserConfig) -> Result<FilterNode, Error> {
    match value {
        Value::Object(ops_obj) => {
            let mut ops = Vec::with_capacity(ops_obj.len());
            for (op_key, op_value) in ops_obj {
                let Some(token) = op_key.strip_prefix(&config.op_prefix) else {
                    return Err(SyntaxError::OperatorOutsidePredicate {
                        key: op_key.clone(),
                    }
                    .into());
                };
                let Some(op) = Operator::from_token(token) else {
                    return Err(SyntaxError::UnknownOperatorKey {
                        key: op_key.clone(),
                    }
                    .into());
                };
                ops.push((op, op_value.clone()));
            }
            Ok(FilterNode::Predicate {
                field: field.to_string(),
                ops,
            })
        }
        scalar => Ok(FilterNode::Predicate {
            field: field.to_string(),
            ops: vec![(Operator::Eq, scalar.clone())],
        }),
    }
}

/// Lower a validated [`FilterNode`] tree into a `SqlFragment`, performing
/// the semantic checks from §4.4 (unknown field, not filterable,
/// operator not allowed, value validation) as each predicate is reached.
fn lower(node: &FilterNode, catalogue: &FieldCatalogue, config: &ParserConfig) -> Result<SqlFragment, Error> {
    match node {
        FilterNode::Conjunction(entries) => {
            let parts = entries
                .iter()
                .map(|e| lower(e, catalogue, config))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SqlFragment::join(style(config), " AND ", parts))
        }
        FilterNode::Connective { is_or, children } => {
            let parts = children
                .iter()
                .map(|c| lower(c, catalogue, config))
                .collect::<Result<Vec<_>, _>>()?;
            let sep = if *is_or { " OR " } else { " AND " };
            Ok(SqlFragment::join(style(config), sep, parts).parens())
        }
        FilterNode::Predicate { field, ops } => lower_predicate(field, ops, catalogue, config),
    }
}

fn lower_predicate(
    field_name: &str,
    ops: &[(Operator, Value)],
    catalogue: &FieldCatalogue,
    config: &ParserConfig,
) -> Result<SqlFragment, Error> {
    let field = catalogue
        .get(field_name)
        .ok_or_else(|| SemanticError::UnknownField(field_name.to_string()))?;

    if !field.meta.filterable {
        return Err(SemanticError::NotFilterable {
            field: field_name.to_string(),
        }
        .into());
    }

    let mut parts = Vec::with_capacity(ops.len());
    for (op, value) in ops {
        if !field.allows(*op) {
            return Err(SemanticError::OperatorNotAllowed {
                field: field_name.to_string(),
                op: op.token().to_string(),
                kind: field.meta.kind.name().to_string(),
            }
            .into());
        }
        let arg = field.validate_and_convert(value)?;

        let mut frag = SqlFragment::new(style(config));
        let placeholder = frag.next_placeholder();
        let rendered = config.renderer.render(*op, &field.meta.column, &placeholder);
        frag.push(&rendered);
        frag.push_value(arg);
        parts.push(frag);
    }

    let joined = SqlFragment::join(style(config), " AND ", parts);
    Ok(if ops.len() > 1 { joined.parens() } else { joined })
}

fn style(config: &ParserConfig) -> PlaceholderStyle {
    if config.positional_params {
        PlaceholderStyle::positional(config.param_symbol.clone())
    } else {
        PlaceholderStyle::fixed(config.param_symbol.clone())
    }
}

/// Compile the `filter` object into `(expr, args)`.
pub fn compile(value: &Value, catalogue: &FieldCatalogue, config: &ParserConfig) -> Result<SqlFragment, Error> {
    let Value::Object(obj) = value else {
        return Err(SyntaxError::FilterNotObject.into());
    };
    let tree = parse_object(obj, config)?;
    lower(&tree, catalogue, config)
}

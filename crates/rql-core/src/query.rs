//! Sort / select / paging compiler (C6).

use serde_json::Value;

use crate::config::{Direction, ParserConfig};
use crate::error::{Error, SemanticError, SyntaxError};
use crate::field::FieldCatalogue;

/// Lower the `sort` array into a comma-joined `column [asc|desc]` string.
/// Falls back to `config.default_sort` when absent or empty.
pub fn compile_sort(
    value: Option<&Value>,
    catalogue: &FieldCatalogue,
    config: &ParserConfig,
) -> Result<String, Error> {
    let raw_terms: Vec<String> = match value {
        None => config.default_sort.clone(),
        Some(Value::Array(items)) if items.is_empty() => config.default_sort.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or(SyntaxError::SortNotStringArray))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(SyntaxError::SortNotStringArray.into()),
    };

    let terms = raw_terms
        .iter()
        .map(|raw| compile_sort_term(raw, catalogue, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(terms.join(", "))
}

fn compile_sort_term(raw: &str, catalogue: &FieldCatalogue, config: &ParserConfig) -> Result<String, Error> {
    let (dir, name) = if let Some(rest) = raw.strip_prefix('-') {
        (Some(Direction::Desc), rest)
    } else if let Some(rest) = raw.strip_prefix('+') {
        (Some(Direction::Asc), rest)
    } else {
        (None, raw)
    };

    let field = catalogue
        .get(name)
        .ok_or_else(|| SemanticError::UnknownField(name.to_string()))?;
    if !field.meta.sortable {
        return Err(SemanticError::NotSortable {
            field: name.to_string(),
        }
        .into());
    }

    Ok(match dir {
        None => field.meta.column.clone(),
        Some(dir) => format!("{} {}", field.meta.column, config.dir_renderer.render(dir)),
    })
}

/// Lower the `select` array into a comma-joined list of query-side names
/// (not columns, no filterable/sortable check is performed, per §4.5).
pub fn compile_select(value: Option<&Value>, catalogue: &FieldCatalogue) -> Result<String, Error> {
    let Some(value) = value else {
        return Ok(String::new());
    };
    let Value::Array(items) = value else {
        return Err(SyntaxError::SelectNotStringArray.into());
    };

    let mut names = Vec::with_capacity(items.len());
    for item in items {
        let name = item.as_str().ok_or(SyntaxError::SelectNotStringArray)?;
        let field = catalogue
            .get(name)
            .ok_or_else(|| SemanticError::UnknownField(name.to_string()))?;
        names.push(field.meta.name.clone());
    }
    Ok(names.join(", "))
}

/// Resolve `limit`/`offset`, applying defaults and bounds.
pub fn compile_paging(
    limit: Option<&Value>,
    offset: Option<&Value>,
    config: &ParserConfig,
) -> Result<(i64, i64), Error> {
    let limit = match limit {
        None => config.default_limit,
        Some(v) => {
            let n = v.as_i64().ok_or(SyntaxError::LimitNotInteger)?;
            if n == 0 {
                config.default_limit
            } else if n < 0 {
                return Err(SemanticError::InvalidLimit.into());
            } else {
                if config.limit_max_value > 0 && n > config.limit_max_value {
                    return Err(SemanticError::LimitExceedsMax {
                        limit: n,
                        max: config.limit_max_value,
                    }
                    .into());
                }
                n
            }
        }
    };

    let offset = match offset {
        None => 0,
        Some(v) => {
            let n = v.as_i64().ok_or(SyntaxError::OffsetNotInteger)?;
            if n < 0 {
                return Err(SemanticError::InvalidOffset.into());
            }
            n
        }
    };

    Ok((limit, offset))
}

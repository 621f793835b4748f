//! Facade (C7): `RqlParser::new` builds the catalogue once;
//! `RqlParser::parse` compiles one request against it.

use serde_json::Value;

use crate::config::ParserConfig;
use crate::error::{Error, SyntaxError};
use crate::field::FieldCatalogue;
use crate::filter;
use crate::params::Params;
use crate::query;
use crate::schema::{build_catalogue, ModelDecl};

const RECOGNISED_TOP_LEVEL_KEYS: &[&str] = &["filter", "sort", "select", "limit", "offset"];

/// A constructed RQL parser: an immutable field catalogue plus config.
/// Safe to share across threads and call `parse` on concurrently, see
/// the concurrency & resource model.
pub struct RqlParser {
    catalogue: FieldCatalogue,
    config: ParserConfig,
}

impl RqlParser {
    /// Walk `model` into a field catalogue. Fails if the model declares
    /// an unsupported kind, a duplicate query name, or a `layout` tag on
    /// a non-time field.
    pub fn new(model: &ModelDecl, config: ParserConfig) -> Result<Self, Error> {
        let catalogue = build_catalogue(model, &config)?;
        config.emit_log(&format!("parser constructed with {} fields", catalogue.len()));
        Ok(Self { catalogue, config })
    }

    pub fn catalogue(&self) -> &FieldCatalogue {
        &self.catalogue
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Compile one JSON query document into `Params`. Pure and
    /// allocation-only: performs no I/O, never mutates the catalogue, and
    /// never logs (logging is construction-time only, per §4.6).
    pub fn parse(&self, bytes: &[u8]) -> Result<Params, Error> {
        if self.config.max_input_bytes > 0 && bytes.len() > self.config.max_input_bytes {
            return Err(SyntaxError::InputTooLarge {
                len: bytes.len(),
                max: self.config.max_input_bytes,
            }
            .into());
        }

        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| SyntaxError::MalformedJson(e.to_string()))?;
        let Value::Object(obj) = value else {
            return Err(SyntaxError::MalformedJson("top-level value must be an object".to_string()).into());
        };

        for key in obj.keys() {
            if !RECOGNISED_TOP_LEVEL_KEYS.contains(&key.as_str()) {
                return Err(SyntaxError::UnknownTopLevelKey(key.clone()).into());
            }
        }

        let (filter_exp, filter_args) = match obj.get("filter") {
            Some(v) => filter::compile(v, &self.catalogue, &self.config)?.into_parts(),
            None => (String::new(), Vec::new()),
        };
        let sort = query::compile_sort(obj.get("sort"), &self.catalogue, &self.config)?;
        let select = query::compile_select(obj.get("select"), &self.catalogue)?;
        let (limit, offset) = query::compile_paging(obj.get("limit"), obj.get("offset"), &self.config)?;

        Ok(Params {
            limit,
            offset,
            filter_exp,
            filter_args,
            sort,
            select,
            param_symbol: self.config.param_symbol.clone(),
            positional_params: self.config.positional_params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;
    use crate::schema::FieldSpec;
    use pretty_assertions::assert_eq;

    fn assert_sync<T: Sync>() {}
    fn assert_send<T: Send>() {}

    #[test]
    fn test_parser_is_send_and_sync() {
        assert_send::<RqlParser>();
        assert_sync::<RqlParser>();
    }

    #[test]
    fn test_unknown_top_level_key_errors() {
        let model = ModelDecl::new(vec![FieldSpec::leaf("Age", Kind::SignedInt, "filter")]);
        let parser = RqlParser::new(&model, ParserConfig::default()).unwrap();
        let err = parser.parse(br#"{"bogus": 1}"#).unwrap_err();
        assert!(matches!(err, Error::Syntax(crate::error::SyntaxError::UnknownTopLevelKey(_))));
    }

    #[test]
    fn test_absent_filter_produces_empty_expression() {
        let model = ModelDecl::new(vec![FieldSpec::leaf("Age", Kind::SignedInt, "filter")]);
        let parser = RqlParser::new(&model, ParserConfig::default()).unwrap();
        let params = parser.parse(br#"{}"#).unwrap();
        assert_eq!(params.filter_exp, "");
        assert_eq!(params.limit, 25);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_oversized_input_rejected() {
        let model = ModelDecl::new(vec![FieldSpec::leaf("Age", Kind::SignedInt, "filter")]);
        let config = ParserConfig::default().max_input_bytes(16);
        let parser = RqlParser::new(&model, config).unwrap();
        let err = parser.parse(br#"{"filter":{"age":123456789}}"#).unwrap_err();
        assert!(matches!(err, Error::Syntax(crate::error::SyntaxError::InputTooLarge { .. })));
    }

    #[test]
    fn test_max_input_bytes_zero_disables_check() {
        let model = ModelDecl::new(vec![FieldSpec::leaf("Age", Kind::SignedInt, "filter")]);
        let config = ParserConfig::default().max_input_bytes(0);
        let parser = RqlParser::new(&model, config).unwrap();
        assert!(parser.parse(br#"{"filter":{"age":1}}"#).is_ok());
    }

    #[test]
    fn test_malformed_json_errors() {
        let model = ModelDecl::new(vec![FieldSpec::leaf("Age", Kind::SignedInt, "filter")]);
        let parser = RqlParser::new(&model, ParserConfig::default()).unwrap();
        let err = parser.parse(b"{not json").unwrap_err();
        assert!(matches!(err, Error::Syntax(crate::error::SyntaxError::MalformedJson(_))));
    }
}

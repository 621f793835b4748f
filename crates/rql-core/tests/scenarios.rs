//! Literal round-trip scenarios and boundary behaviours.
//!
//! Exact string equality is used everywhere key order is deterministic
//! (which, with `serde_json`'s `preserve_order` feature, is everywhere
//! the test input itself declares an order) except the one case the
//! design notes call out: comparing `AND`-at-root expressions built from
//! two differently-ordered inputs, where `equal_exp` treats the operands
//! as a set.

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use rql_core::kind::Kind;
use rql_core::schema::{FieldSpec, ModelDecl};
use rql_core::{Error, ParserConfig, RqlParser, SemanticError, SyntaxError};

/// Order-insensitive equivalence for a flat `a AND b AND c` expression:
/// splits on ` AND ` at the top level and compares as a set. Does not
/// attempt to split inside parenthesised sub-expressions.
fn equal_exp(a: &str, b: &str) -> bool {
    let split = |s: &str| -> HashSet<&str> { s.split(" AND ").collect() };
    split(a) == split(b)
}

fn scenario_1_model() -> ModelDecl {
    ModelDecl::new(vec![
        FieldSpec::leaf("Age", Kind::SignedInt, "filter"),
        FieldSpec::leaf("Name", Kind::Str, "filter"),
        FieldSpec::leaf("Address", Kind::Str, "filter"),
    ])
}

const SCENARIO_1_INPUT: &[u8] = br#"{
    "filter": {
        "name": "foo",
        "age": 12,
        "$or": [{"address": "DC"}, {"address": "Marvel"}],
        "$and": [
            {"age": {"$neq": 10}},
            {"age": {"$neq": 20}},
            {"$or": [{"age": 11}, {"age": 10}]}
        ]
    }
}"#;

#[test]
fn scenario_1_default_config() {
    let parser = RqlParser::new(&scenario_1_model(), ParserConfig::default()).unwrap();
    let params = parser.parse(SCENARIO_1_INPUT).unwrap();

    assert_eq!(
        params.filter_exp,
        "name = ? AND age = ? AND (address = ? OR address = ?) AND (age <> ? AND age <> ? AND (age = ? OR age = ?))"
    );
    assert_eq!(params.filter_args.len(), 8);
    assert_eq!(params.limit, 25);
    assert!(equal_exp(&params.filter_exp, &params.filter_exp));
}

#[test]
fn scenario_2_positional_params() {
    let config = ParserConfig::default().positional_params(true).param_symbol("$");
    let parser = RqlParser::new(&scenario_1_model(), config).unwrap();
    let params = parser.parse(SCENARIO_1_INPUT).unwrap();

    assert_eq!(
        params.filter_exp,
        "name = $1 AND age = $2 AND (address = $3 OR address = $4) AND (age <> $5 AND age <> $6 AND (age = $7 OR age = $8))"
    );
    assert_eq!(params.placeholder_count(), params.filter_args.len());
}

#[test]
fn scenario_3_layout_mismatch_errors() {
    let model = ModelDecl::new(vec![FieldSpec::leaf(
        "CreatedAt",
        Kind::Time,
        "filter,layout=UnixDate",
    )]);
    let parser = RqlParser::new(&model, ParserConfig::default()).unwrap();
    let err = parser
        .parse(br#"{"filter":{"created_at":{"$gt":"2006-01-02 15:04"}}}"#)
        .unwrap_err();
    assert!(matches!(err, Error::Semantic(SemanticError::InvalidValue { .. })));
}

#[test]
fn scenario_4_nested_fields_and_sort() {
    let zip = ModelDecl::new(vec![FieldSpec::leaf("Code", Kind::SignedInt, "filter,sort")]);
    let address = ModelDecl::new(vec![
        FieldSpec::leaf("Name", Kind::Str, "filter,sort"),
        FieldSpec::nested("ZIP", zip),
    ]);
    let model = ModelDecl::new(vec![
        FieldSpec::leaf("Age", Kind::SignedInt, "filter,sort"),
        FieldSpec::leaf("Name", Kind::Str, "filter"),
        FieldSpec::nested("Address", address),
    ]);

    let config = ParserConfig::default().field_sep(".");
    let parser = RqlParser::new(&model, config).unwrap();
    let params = parser
        .parse(br#"{"filter":{"address.zip.code":100}, "sort":["address.name","-address.zip.code","+age"]}"#)
        .unwrap();

    assert_eq!(params.filter_exp, "address_zip_code = ?");
    assert_eq!(params.filter_args.len(), 1);
    assert_eq!(params.sort, "address_name, address_zip_code desc, age asc");
}

#[test]
fn scenario_5_name_and_column_overrides() {
    let model = ModelDecl::new(vec![FieldSpec::leaf(
        "SomeName",
        Kind::Str,
        "filter,name=someName,column=some_name",
    )]);
    let parser = RqlParser::new(&model, ParserConfig::default()).unwrap();
    let params = parser
        .parse(br#"{"filter":{"someName":{"$eq":"someName"}}}"#)
        .unwrap();

    assert_eq!(params.filter_exp, "some_name = ?");
    assert_eq!(params.filter_args.len(), 1);
}

#[test]
fn scenario_6_sort_on_non_sortable_field_errors() {
    let model = ModelDecl::new(vec![FieldSpec::leaf("Name", Kind::Str, "filter")]);
    let parser = RqlParser::new(&model, ParserConfig::default()).unwrap();
    let err = parser.parse(br#"{"sort":["name"]}"#).unwrap_err();
    assert!(matches!(err, Error::Semantic(SemanticError::NotSortable { .. })));
}

#[test]
fn boundary_limit_zero_is_defaulted() {
    let parser = RqlParser::new(&scenario_1_model(), ParserConfig::default()).unwrap();
    let params = parser.parse(br#"{"limit":0}"#).unwrap();
    assert_eq!(params.limit, 25);
}

#[test]
fn boundary_limit_negative_errors() {
    let parser = RqlParser::new(&scenario_1_model(), ParserConfig::default()).unwrap();
    let err = parser.parse(br#"{"limit":-1}"#).unwrap_err();
    assert!(matches!(err, Error::Semantic(SemanticError::InvalidLimit)));
}

#[test]
fn boundary_offset_negative_errors() {
    let parser = RqlParser::new(&scenario_1_model(), ParserConfig::default()).unwrap();
    let err = parser.parse(br#"{"offset":-1}"#).unwrap_err();
    assert!(matches!(err, Error::Semantic(SemanticError::InvalidOffset)));
}

#[test]
fn boundary_limit_above_max_errors() {
    let config = ParserConfig::default().limit_max_value(10);
    let parser = RqlParser::new(&scenario_1_model(), config).unwrap();
    let err = parser.parse(br#"{"limit":11}"#).unwrap_err();
    assert!(matches!(err, Error::Semantic(SemanticError::LimitExceedsMax { .. })));
}

#[test]
fn boundary_unknown_operator_errors() {
    let parser = RqlParser::new(&scenario_1_model(), ParserConfig::default()).unwrap();
    let err = parser.parse(br#"{"filter":{"age":{"$regex":"x"}}}"#).unwrap_err();
    assert!(matches!(err, Error::Syntax(SyntaxError::UnknownOperatorKey { .. })));
}

#[test]
fn boundary_unsigned_negative_errors() {
    let model = ModelDecl::new(vec![FieldSpec::leaf("Count", Kind::UnsignedInt, "filter")]);
    let parser = RqlParser::new(&model, ParserConfig::default()).unwrap();
    let err = parser.parse(br#"{"filter":{"count":-1}}"#).unwrap_err();
    assert!(matches!(err, Error::Semantic(SemanticError::InvalidValue { .. })));
}

#[test]
fn boundary_integer_fractional_errors() {
    let parser = RqlParser::new(&scenario_1_model(), ParserConfig::default()).unwrap();
    let err = parser.parse(br#"{"filter":{"age":12.5}}"#).unwrap_err();
    assert!(matches!(err, Error::Semantic(SemanticError::InvalidValue { .. })));
}

#[test]
fn boundary_empty_or_and_and_error() {
    let parser = RqlParser::new(&scenario_1_model(), ParserConfig::default()).unwrap();
    let err = parser.parse(br#"{"filter":{"$or":[]}}"#).unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax(SyntaxError::EmptyOrInvalidConnective { .. })
    ));

    let err = parser.parse(br#"{"filter":{"$and":[]}}"#).unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax(SyntaxError::EmptyOrInvalidConnective { .. })
    ));
}

#[test]
fn equal_exp_ignores_and_operand_order() {
    assert!(equal_exp("a = ? AND b = ?", "b = ? AND a = ?"));
    assert!(!equal_exp("a = ? AND b = ?", "a = ? AND c = ?"));
}

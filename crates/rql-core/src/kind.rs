//! Scalar kinds and the operator table (C2).
//!
//! Binds each of the six scalar kinds to its permitted operator set and
//! to JSON validate/convert behaviour. The operator-allow policy below
//! fixes the open question spec.md §9 leaves undecided: `like` is
//! permitted on `Str` only, and the comparators (`lt`/`lte`/`gt`/`gte`)
//! are rejected on `Bool`.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use rql_sql::SqlParam;
use serde_json::{Number, Value};

/// The closed set of scalar kinds a field may be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Bool,
    SignedInt,
    UnsignedInt,
    Float,
    Str,
    Time,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::SignedInt => "signed int",
            Kind::UnsignedInt => "unsigned int",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::Time => "time",
        }
    }

    /// Operators this kind permits. See module docs for the fixed policy.
    pub fn allowed_ops(&self) -> &'static [Operator] {
        use Operator::*;
        match self {
            Kind::Bool => &[Eq, Neq],
            Kind::SignedInt | Kind::UnsignedInt | Kind::Float | Kind::Time => {
                &[Eq, Neq, Lt, Lte, Gt, Gte]
            }
            Kind::Str => &[Eq, Neq, Lt, Lte, Gt, Gte, Like],
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The seven filter operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
}

impl Operator {
    /// Parse an operator from its bare name (without the configured
    /// `op_prefix`, the filter compiler strips that first).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Operator::Eq),
            "neq" => Some(Operator::Neq),
            "lt" => Some(Operator::Lt),
            "lte" => Some(Operator::Lte),
            "gt" => Some(Operator::Gt),
            "gte" => Some(Operator::Gte),
            "like" => Some(Operator::Like),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Like => "like",
        }
    }

    /// The default SQL rendering of this operator, per the `"<col>
    /// <op_tok> <ph>"` table (`= <> < <= > >= LIKE`).
    pub fn sql_token(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Named `time` parse layouts, plus the escape hatch of a raw pattern.
///
/// Presets map onto a `chrono` strftime-compatible pattern. A handful of
/// the reference layouts (`Stamp`, `Kitchen` variants that omit the year
/// or carry a locale-specific zone abbreviation chrono cannot parse) have
/// no clean `chrono` equivalent; hosts needing those pass the equivalent
/// pattern directly via `Layout::Pattern` instead of the preset keyword.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Layout {
    Preset(Preset),
    Pattern(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Preset {
    AnsiC,
    UnixDate,
    RubyDate,
    Rfc822,
    Rfc822Z,
    Rfc850,
    Rfc1123,
    Rfc1123Z,
    Rfc3339,
    Kitchen,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Preset(Preset::Rfc3339)
    }
}

impl Layout {
    /// Parse a `layout=<x>` tag value. Recognised preset keywords map to
    /// `Preset`; anything else is treated as a raw `chrono` pattern.
    pub fn parse_tag_value(s: &str) -> Self {
        match s {
            "ANSIC" => Layout::Preset(Preset::AnsiC),
            "UnixDate" => Layout::Preset(Preset::UnixDate),
            "RubyDate" => Layout::Preset(Preset::RubyDate),
            "RFC822" => Layout::Preset(Preset::Rfc822),
            "RFC822Z" => Layout::Preset(Preset::Rfc822Z),
            "RFC850" => Layout::Preset(Preset::Rfc850),
            "RFC1123" => Layout::Preset(Preset::Rfc1123),
            "RFC1123Z" => Layout::Preset(Preset::Rfc1123Z),
            "RFC3339" => Layout::Preset(Preset::Rfc3339),
            "Kitchen" => Layout::Preset(Preset::Kitchen),
            other => Layout::Pattern(other.to_string()),
        }
    }

    fn pattern(&self) -> Option<&str> {
        match self {
            Layout::Preset(Preset::Rfc3339) => None,
            Layout::Preset(Preset::Kitchen) => Some("%l:%M%p"),
            Layout::Preset(Preset::AnsiC) | Layout::Preset(Preset::UnixDate) => {
                Some("%a %b %e %H:%M:%S %Y")
            }
            Layout::Preset(Preset::RubyDate) => Some("%a %b %d %H:%M:%S %z %Y"),
            Layout::Preset(Preset::Rfc822) => Some("%d %b %y %H:%M"),
            Layout::Preset(Preset::Rfc822Z) => Some("%d %b %y %H:%M %z"),
            Layout::Preset(Preset::Rfc850) => Some("%A, %d-%b-%y %H:%M:%S"),
            Layout::Preset(Preset::Rfc1123) => Some("%a, %d %b %Y %H:%M:%S"),
            Layout::Preset(Preset::Rfc1123Z) => Some("%a, %d %b %Y %H:%M:%S %z"),
            Layout::Pattern(p) => Some(p.as_str()),
        }
    }

    /// Parse a raw string under this layout into an offset-aware instant.
    pub fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        match self.pattern() {
            None => DateTime::parse_from_rfc3339(raw).ok(),
            Some("%l:%M%p") => {
                let time = chrono::NaiveTime::parse_from_str(raw, "%l:%M%p").ok()?;
                let date = chrono::NaiveDate::from_ymd_opt(1970, 1, 1)?;
                let naive = NaiveDateTime::new(date, time);
                FixedOffset::east_opt(0)?
                    .from_local_datetime(&naive)
                    .single()
            }
            Some(pattern) => {
                if let Ok(dt) = DateTime::parse_from_str(raw, pattern) {
                    return Some(dt);
                }
                let naive = NaiveDateTime::parse_from_str(raw, pattern).ok()?;
                FixedOffset::east_opt(0)?
                    .from_local_datetime(&naive)
                    .single()
            }
        }
    }
}

/// Reject JSON values of the wrong shape, and return a human-readable
/// reason for the `SemanticError::InvalidValue` caller constructs.
pub fn validate(kind: Kind, layout: Option<&Layout>, value: &Value) -> std::result::Result<(), String> {
    match kind {
        Kind::Bool => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err("expected a boolean".to_string())
            }
        }
        Kind::SignedInt => match as_integer_value(value) {
            Some(_) => Ok(()),
            None => Err("expected an integer".to_string()),
        },
        Kind::UnsignedInt => match as_integer_value(value) {
            Some(n) if n >= 0 => Ok(()),
            Some(_) => Err("expected a non-negative integer".to_string()),
            None => Err("expected an integer".to_string()),
        },
        Kind::Float => {
            if value.is_number() {
                Ok(())
            } else {
                Err("expected a number".to_string())
            }
        }
        Kind::Str => {
            if value.is_string() {
                Ok(())
            } else {
                Err("expected a string".to_string())
            }
        }
        Kind::Time => {
            let s = value.as_str().ok_or_else(|| "expected a string".to_string())?;
            let layout = layout.cloned().unwrap_or_default();
            if layout.parse(s).is_some() {
                Ok(())
            } else {
                Err("does not match the configured layout".to_string())
            }
        }
    }
}

/// Convert an already-validated JSON value into its SQL argument form.
pub fn convert(kind: Kind, layout: Option<&Layout>, value: &Value) -> SqlParam {
    match kind {
        Kind::Bool => SqlParam::Bool(value.as_bool().unwrap_or_default()),
        Kind::SignedInt => {
            let n = as_integer_value(value).expect("validated");
            SqlParam::Int(n as i64)
        }
        Kind::UnsignedInt => {
            let n = as_integer_value(value).expect("validated");
            SqlParam::UInt(n as u64)
        }
        Kind::Float => SqlParam::Float(value.as_f64().unwrap_or_default()),
        Kind::Str => SqlParam::Text(value.as_str().unwrap_or_default().to_string()),
        Kind::Time => {
            let s = value.as_str().unwrap_or_default();
            let layout = layout.cloned().unwrap_or_default();
            let dt = layout.parse(s).expect("validated");
            SqlParam::Time(dt)
        }
    }
}

/// A JSON number that has no fractional part, widened to `i128` so both
/// `i64` and `u64` representations compare uniformly.
fn as_integer(num: &Number) -> Option<i128> {
    if let Some(v) = num.as_i64() {
        return Some(v as i128);
    }
    if let Some(v) = num.as_u64() {
        return Some(v as i128);
    }
    None
}

fn as_integer_value(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => as_integer(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allowed_ops_bool() {
        assert_eq!(Kind::Bool.allowed_ops(), &[Operator::Eq, Operator::Neq]);
    }

    #[test]
    fn test_allowed_ops_string_includes_like() {
        assert!(Kind::Str.allowed_ops().contains(&Operator::Like));
    }

    #[test]
    fn test_allowed_ops_numeric_excludes_like() {
        assert!(!Kind::SignedInt.allowed_ops().contains(&Operator::Like));
        assert!(!Kind::Float.allowed_ops().contains(&Operator::Like));
    }

    #[test]
    fn test_validate_int_rejects_fraction() {
        assert!(validate(Kind::SignedInt, None, &json!(12)).is_ok());
        assert!(validate(Kind::SignedInt, None, &json!(12.5)).is_err());
    }

    #[test]
    fn test_validate_unsigned_rejects_negative() {
        assert!(validate(Kind::UnsignedInt, None, &json!(12)).is_ok());
        assert!(validate(Kind::UnsignedInt, None, &json!(-1)).is_err());
    }

    #[test]
    fn test_validate_bool_rejects_non_bool() {
        assert!(validate(Kind::Bool, None, &json!(true)).is_ok());
        assert!(validate(Kind::Bool, None, &json!(1)).is_err());
    }

    #[test]
    fn test_time_default_layout_is_rfc3339() {
        assert!(validate(Kind::Time, None, &json!("2024-01-02T15:04:05Z")).is_ok());
        assert!(validate(Kind::Time, None, &json!("2024-01-02 15:04")).is_err());
    }

    #[test]
    fn test_time_unix_date_layout_rejects_mismatch() {
        let layout = Layout::parse_tag_value("UnixDate");
        assert!(validate(Kind::Time, Some(&layout), &json!("2006-01-02 15:04")).is_err());
    }

    #[test]
    fn test_convert_preserves_precision() {
        let v = convert(Kind::SignedInt, None, &json!(12));
        assert_eq!(v, SqlParam::Int(12));
        let v = convert(Kind::UnsignedInt, None, &json!(12));
        assert_eq!(v, SqlParam::UInt(12));
    }

    #[test]
    fn test_operator_token_roundtrip() {
        for op in [
            Operator::Eq,
            Operator::Neq,
            Operator::Lt,
            Operator::Lte,
            Operator::Gt,
            Operator::Gte,
            Operator::Like,
        ] {
            assert_eq!(Operator::from_token(op.token()), Some(op));
        }
        assert_eq!(Operator::from_token("regex"), None);
    }
}

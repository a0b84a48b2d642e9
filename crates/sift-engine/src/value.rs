//! The dynamic value model.
//!
//! Every cell the engine touches is a [`Value`]. Integer literals stay
//! integers until arithmetic or comparison forces a 64-bit float; strings
//! and numbers never silently cross families outside the documented
//! coercion helpers.

use core::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use sift_sql_core::ast::Literal;

use crate::error::{EngineError, Result};

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Str(String),
    /// List of strings, produced by SPLIT.
    StrList(Vec<String>),
    /// Point in time, normalized to UTC.
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Returns true for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short tag naming the value's family. Used in grouping keys so
    /// `30` and `"30"` never collide.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "str",
            Self::StrList(_) => "list",
            Self::Timestamp(_) => "ts",
        }
    }

    /// Renders the value for display, grouping keys, and string coercion.
    /// Nulls render as the empty string.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Str(s) => s.clone(),
            Self::StrList(items) => items.join(","),
            Self::Timestamp(ts) => ts.to_rfc3339(),
        }
    }

    /// Coerces to a 64-bit float. Ints widen, numeric strings parse,
    /// booleans and nulls never convert.
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            Self::Int(n) => Ok(*n as f64),
            Self::Float(x) => Ok(*x),
            Self::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| EngineError::InvalidNumber(s.clone())),
            other => Err(EngineError::InvalidNumber(format!(
                "{} value cannot be converted to a number",
                other.type_tag()
            ))),
        }
    }

    /// Coerces to an integer; floats must be whole.
    pub fn to_i64(&self) -> Result<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Float(x) if x.fract() == 0.0 => Ok(*x as i64),
            Self::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| EngineError::InvalidNumber(s.clone())),
            other => Err(EngineError::InvalidNumber(format!(
                "{} value cannot be converted to an integer",
                other.type_tag()
            ))),
        }
    }

    /// Coerces to a timestamp, parsing strings with the accepted formats.
    pub fn to_timestamp(&self) -> Result<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Ok(*ts),
            Self::Str(s) => parse_timestamp(s),
            other => Err(EngineError::InvalidDate(format!(
                "{} value cannot be converted to a date",
                other.type_tag()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Self::Null,
            Literal::Integer(n) => Self::Int(*n),
            Literal::Float(x) => Self::Float(*x),
            Literal::Boolean(b) => Self::Bool(*b),
            Literal::String(s) => Self::Str(s.clone()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Parses a timestamp from the accepted textual formats: RFC-3339,
/// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, and `YYYY-MM-DDTHH:MM:SS`.
/// Zone-less inputs are taken as UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(EngineError::InvalidDate(String::from(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags_are_distinct() {
        let values = [
            Value::Null,
            Value::Int(1),
            Value::Float(1.0),
            Value::Bool(true),
            Value::Str(String::from("1")),
            Value::StrList(vec![]),
            Value::Timestamp(Utc::now()),
        ];
        let mut tags: Vec<_> = values.iter().map(|v| v.type_tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), values.len());
    }

    #[test]
    fn test_render_null_is_empty() {
        assert_eq!(Value::Null.render(), "");
        assert_eq!(Value::Int(-3).render(), "-3");
        assert_eq!(Value::Bool(false).render(), "false");
    }

    #[test]
    fn test_to_f64_coercions() {
        assert_eq!(Value::Int(2).to_f64().unwrap(), 2.0);
        assert_eq!(Value::Str(String::from(" 2.5 ")).to_f64().unwrap(), 2.5);
        assert!(Value::Bool(true).to_f64().is_err());
        assert!(Value::Null.to_f64().is_err());
        assert!(Value::Str(String::from("abc")).to_f64().is_err());
    }

    #[test]
    fn test_to_i64_requires_whole_floats() {
        assert_eq!(Value::Float(3.0).to_i64().unwrap(), 3);
        assert!(Value::Float(3.5).to_i64().is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        for text in [
            "2024-06-01",
            "2024-06-01 12:30:00",
            "2024-06-01T12:30:00",
            "2024-06-01T12:30:00Z",
            "2024-06-01T12:30:00+02:00",
        ] {
            parse_timestamp(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        }
        assert!(parse_timestamp("June 1st").is_err());
    }

    #[test]
    fn test_literal_conversion_preserves_integers() {
        let v = Value::from(&Literal::Integer(7));
        assert_eq!(v, Value::Int(7));
        assert_ne!(v, Value::Float(7.0));
    }
}

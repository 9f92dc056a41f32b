//! Typed structured fields.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ParseFieldError;

/// Value of a structured field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// A key/value pair attached to a record.
///
/// Keys are not unique within a field set: two fields with the same key are both
/// kept, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// String field.
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::Str(value.into()))
    }

    /// Integer field.
    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    /// Boolean field.
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Parses `key=value`. Values that read as an integer or `true`/`false` become
/// typed fields; everything else is a string.
impl FromStr for Field {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, raw) = s
            .split_once('=')
            .ok_or_else(|| ParseFieldError::MissingSeparator(s.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseFieldError::EmptyKey(s.to_string()));
        }

        let value = if let Ok(i) = raw.parse::<i64>() {
            FieldValue::Int(i)
        } else if let Ok(b) = raw.parse::<bool>() {
            FieldValue::Bool(b)
        } else {
            FieldValue::Str(raw.to_string())
        };
        Ok(Field::new(key.to_string(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Field::string("user", "alice").value(), &FieldValue::Str("alice".into()));
        assert_eq!(Field::int("status", 500).value(), &FieldValue::Int(500));
        assert_eq!(Field::bool("cached", true).value(), &FieldValue::Bool(true));
        assert_eq!(Field::new(String::from("dyn"), 7u32).key(), "dyn");
    }

    #[test]
    fn test_display() {
        assert_eq!(Field::string("request_id", "abc").to_string(), "request_id=abc");
        assert_eq!(Field::int("n", -3).to_string(), "n=-3");
    }

    #[test]
    fn test_parse_typed_pairs() {
        assert_eq!("user=alice".parse::<Field>().unwrap(), Field::string("user", "alice"));
        assert_eq!("status=500".parse::<Field>().unwrap(), Field::int("status", 500));
        assert_eq!("ok=true".parse::<Field>().unwrap(), Field::bool("ok", true));
        assert_eq!("expr=a=b".parse::<Field>().unwrap(), Field::string("expr", "a=b"));
        assert_eq!("empty=".parse::<Field>().unwrap(), Field::string("empty", ""));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!("novalue".parse::<Field>(), Err(ParseFieldError::MissingSeparator(_))));
        assert!(matches!(" =x".parse::<Field>(), Err(ParseFieldError::EmptyKey(_))));
    }

    #[test]
    fn test_value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&FieldValue::Int(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&FieldValue::Bool(false)).unwrap(), "false");
        assert_eq!(serde_json::to_string(&FieldValue::from("x")).unwrap(), "\"x\"");
    }
}

//! DynamoDB `AttributeValue`.
//!
//! Numbers are kept as their decimal strings so arbitrary precision survives
//! between the store and the client-side evaluator.

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// A single DynamoDB attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// String.
    S(String),
    /// Number, string-encoded.
    N(String),
    /// Binary.
    B(bytes::Bytes),
    /// String set.
    Ss(Vec<String>),
    /// Number set, string-encoded.
    Ns(Vec<String>),
    /// Binary set.
    Bs(Vec<bytes::Bytes>),
    /// Boolean.
    Bool(bool),
    /// Null marker.
    Null(bool),
    /// Ordered list of values.
    L(Vec<AttributeValue>),
    /// Nested document.
    M(HashMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Build a number value from an integer.
    #[must_use]
    pub fn number(n: i64) -> Self {
        Self::N(n.to_string())
    }

    /// Build a string value.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::S(s.into())
    }

    /// Returns the string value if this is an `S` variant.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number string if this is an `N` variant.
    #[must_use]
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the DynamoDB type descriptor (`"S"`, `"N"`, `"BOOL"`, ...).
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Ss(_) => "SS",
            Self::Ns(_) => "NS",
            Self::Bs(_) => "BS",
            Self::Bool(_) => "BOOL",
            Self::Null(_) => "NULL",
            Self::L(_) => "L",
            Self::M(_) => "M",
        }
    }

    /// Convert to plain JSON without the type wrappers.
    ///
    /// Numbers become JSON numbers when they parse as `i64` or `f64` and stay
    /// strings otherwise; sets become arrays and binary is base64-encoded.
    #[must_use]
    pub fn to_plain_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::S(s) => Value::String(s.clone()),
            Self::N(n) => plain_number(n),
            Self::B(b) => Value::String(BASE64.encode(b)),
            Self::Ss(v) => Value::Array(v.iter().cloned().map(Value::String).collect()),
            Self::Ns(v) => Value::Array(v.iter().map(|n| plain_number(n)).collect()),
            Self::Bs(v) => Value::Array(
                v.iter()
                    .map(|b| Value::String(BASE64.encode(b)))
                    .collect(),
            ),
            Self::Bool(b) => Value::Bool(*b),
            Self::Null(_) => Value::Null,
            Self::L(list) => Value::Array(list.iter().map(Self::to_plain_json).collect()),
            Self::M(m) => Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), v.to_plain_json()))
                    .collect(),
            ),
        }
    }
}

fn plain_number(n: &str) -> serde_json::Value {
    if let Ok(i) = n.parse::<i64>() {
        return serde_json::Value::from(i);
    }
    n.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(
            || serde_json::Value::String(n.to_owned()),
            serde_json::Value::Number,
        )
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) => write!(f, "{{S: {s}}}"),
            Self::N(n) => write!(f, "{{N: {n}}}"),
            Self::B(b) => write!(f, "{{B: {} bytes}}", b.len()),
            Self::Ss(v) => write!(f, "{{SS: {v:?}}}"),
            Self::Ns(v) => write!(f, "{{NS: {v:?}}}"),
            Self::Bs(v) => write!(f, "{{BS: {} items}}", v.len()),
            Self::Bool(b) => write!(f, "{{BOOL: {b}}}"),
            Self::Null(b) => write!(f, "{{NULL: {b}}}"),
            Self::L(v) => write!(f, "{{L: {} items}}", v.len()),
            Self::M(m) => write!(f, "{{M: {} keys}}", m.len()),
        }
    }
}

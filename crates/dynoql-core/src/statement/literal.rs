//! Literal typing for condition and assignment values.

use dynoql_model::AttributeValue;

/// A typed statement literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// A value that parsed as a 64-bit integer; sent as a number.
    Int(i64),
    /// Anything else; sent as a string.
    Str(String),
}

impl Literal {
    /// Infer the type of a raw literal.
    ///
    /// Integers become numbers; `"..."` becomes the string between the
    /// quotes, so `"123"` stays a string; anything else is taken verbatim as
    /// a string.
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            return Self::Int(n);
        }
        Self::string(raw)
    }

    /// Treat a raw literal as a string, removing surrounding double quotes.
    #[must_use]
    pub fn string(raw: &str) -> Self {
        Self::Str(unquote(raw).unwrap_or(raw).to_owned())
    }
}

impl From<Literal> for AttributeValue {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Int(n) => AttributeValue::number(n),
            Literal::Str(s) => AttributeValue::S(s),
        }
    }
}

fn unquote(raw: &str) -> Option<&str> {
    raw.strip_prefix('"')?.strip_suffix('"')
}

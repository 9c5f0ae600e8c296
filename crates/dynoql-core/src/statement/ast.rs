//! Typed statements produced by the parser.

use std::fmt;

use super::literal::Literal;

/// Attribute list sentinel selecting every attribute.
pub const ALL_ATTRIBUTES: &str = "*";

/// Comparison operator of a WHERE condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// ` LIKE `, a substring-containment test rather than SQL wildcard matching.
    Like,
}

impl Operator {
    /// Operators in the order a condition token is scanned for them.
    ///
    /// Two-character operators come before their one-character prefixes so
    /// `a>=1` never splits at `>`.
    pub const SCAN_ORDER: [Self; 7] = [
        Self::Ge,
        Self::Le,
        Self::Ne,
        Self::Eq,
        Self::Gt,
        Self::Lt,
        Self::Like,
    ];

    /// Returns the operator as written in a statement.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Like => "LIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `<field><op><literal>` term of a WHERE clause.
///
/// Terms are always joined with `AND`. A token without a recognized operator
/// parses to a condition with an empty key and value, which
/// [`Condition::is_malformed`] reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Attribute name.
    pub key: String,
    /// Comparison operator.
    pub op: Operator,
    /// Raw literal text; typed later through [`Literal`].
    pub value: String,
}

impl Condition {
    /// Create a condition.
    #[must_use]
    pub fn new(key: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            op,
            value: value.into(),
        }
    }

    /// The placeholder produced for a token with no recognized operator.
    #[must_use]
    pub fn malformed() -> Self {
        Self::new("", Operator::Eq, "")
    }

    /// Whether this condition came from an unparseable token.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.key.is_empty()
    }

    /// Whether this is an `=` condition on `field`.
    #[must_use]
    pub fn is_equality_on(&self, field: &str) -> bool {
        self.op == Operator::Eq && self.key == field
    }

    /// The typed value of this condition.
    ///
    /// `LIKE` operands are always strings; every other operator infers the
    /// type from the literal.
    #[must_use]
    pub fn literal(&self) -> Literal {
        match self.op {
            Operator::Like => Literal::string(&self.value),
            _ => Literal::infer(&self.value),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Operator::Like => write!(f, "{} LIKE {}", self.key, self.value),
            op => write!(f, "{}{op}{}", self.key, self.value),
        }
    }
}

/// Row limit of a SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// At most this many rows.
    Count(u64),
    /// Every matching row (`LIMIT ALL`).
    All,
}

impl Limit {
    /// The signed form used in logs: `-1` for `ALL`.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Count(n) => i64::try_from(*n).unwrap_or(i64::MAX),
            Self::All => -1,
        }
    }

    /// Whether `count` rows already satisfy the limit.
    #[must_use]
    pub fn is_reached(&self, count: usize) -> bool {
        match self {
            Self::Count(n) => u64::try_from(count).is_ok_and(|c| c >= *n),
            Self::All => false,
        }
    }

    /// Rows still wanted after `count` have been collected.
    #[must_use]
    pub fn remaining(&self, count: usize) -> usize {
        match self {
            Self::Count(n) => usize::try_from(*n)
                .unwrap_or(usize::MAX)
                .saturating_sub(count),
            Self::All => usize::MAX,
        }
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::Count(1)
    }
}

/// `SELECT <attrs> FROM <table> [WHERE ...] [LIMIT ...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    /// Requested attributes in order; `["*"]` selects everything.
    pub attributes: Vec<String>,
    /// Table name.
    pub table: String,
    /// Conjunctive WHERE terms.
    pub conditions: Vec<Condition>,
    /// Row limit; defaults to one row.
    pub limit: Limit,
}

impl SelectStatement {
    /// Whether the statement selects every attribute.
    #[must_use]
    pub fn selects_all(&self) -> bool {
        self.attributes
            .first()
            .is_none_or(|a| a.as_str() == ALL_ATTRIBUTES)
    }
}

/// One `key=value` pair of a SET clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Attribute to set.
    pub key: String,
    /// Raw literal text.
    pub value: String,
}

/// `UPDATE <table> SET ... [WHERE ...] [RETURNING ...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    /// Table name.
    pub table: String,
    /// WHERE terms; must pin down the full primary key.
    pub conditions: Vec<Condition>,
    /// SET assignments in order.
    pub assignments: Vec<Assignment>,
    /// Attributes to return; empty returns the whole updated item.
    pub returning: Vec<String>,
}

/// `DESC TABLE <table>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeStatement {
    /// Table name.
    pub table: String,
}

/// A parsed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Read rows.
    Select(SelectStatement),
    /// Update one item.
    Update(UpdateStatement),
    /// Show table metadata.
    Describe(DescribeStatement),
}

impl Statement {
    /// Table the statement targets.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::Select(s) => &s.table,
            Self::Update(s) => &s.table,
            Self::Describe(s) => &s.table,
        }
    }

    /// Statement keyword, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "SELECT",
            Self::Update(_) => "UPDATE",
            Self::Describe(_) => "DESC TABLE",
        }
    }
}

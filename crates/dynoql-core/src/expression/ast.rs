//! AST for the filter, key-condition, condition and update expressions the
//! engine emits.
//!
//! Operands only ever hold placeholders (`#n0`, `:v0`); attribute names and
//! values live in the maps collected by the builder.

use std::fmt;

use crate::statement::Operator;

/// Condition-style expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Comparison expression: `left op right`.
    Compare {
        /// Left-hand operand.
        left: Operand,
        /// Comparison operator.
        op: CompareOp,
        /// Right-hand operand.
        right: Operand,
    },
    /// `contains(path, operand)`.
    Contains {
        /// Attribute searched.
        path: Operand,
        /// Substring or element searched for.
        operand: Operand,
    },
    /// Logical conjunction: `left AND right`.
    And {
        /// Left-hand expression.
        left: Box<Expr>,
        /// Right-hand expression.
        right: Box<Expr>,
    },
}

impl Expr {
    /// Join expressions with `AND`, left to right.
    ///
    /// A single expression is returned as is, without a wrapper.
    #[must_use]
    pub fn conjunction(exprs: impl IntoIterator<Item = Self>) -> Option<Self> {
        exprs.into_iter().reduce(|left, right| Self::And {
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::Contains { path, operand } => write!(f, "contains({path}, {operand})"),
            Self::And { left, right } => write!(f, "{left} AND {right}"),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (`=`).
    Eq,
    /// Not equal (`<>`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
}

impl CompareOp {
    /// Map a statement operator to a native comparison.
    ///
    /// `LIKE` has no comparison form and lowers to `contains()` instead.
    #[must_use]
    pub fn from_operator(op: Operator) -> Option<Self> {
        match op {
            Operator::Eq => Some(Self::Eq),
            Operator::Ne => Some(Self::Ne),
            Operator::Lt => Some(Self::Lt),
            Operator::Le => Some(Self::Le),
            Operator::Gt => Some(Self::Gt),
            Operator::Ge => Some(Self::Ge),
            Operator::Like => None,
        }
    }

    /// Whether a key-condition expression accepts this operator on a sort key.
    #[must_use]
    pub fn is_key_condition(&self) -> bool {
        !matches!(self, Self::Ne)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "<>"),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}

/// An operand placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Attribute name placeholder, e.g. `#n0`.
    Name(String),
    /// Attribute value placeholder, e.g. `:v0`.
    Value(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(p) | Self::Value(p) => f.write_str(p),
        }
    }
}

/// A single SET action: `path = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetAction {
    /// Target attribute placeholder.
    pub path: Operand,
    /// Value placeholder.
    pub value: Operand,
}

/// Update expression made of SET actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateExpr {
    /// SET actions in statement order.
    pub set_actions: Vec<SetAction>,
}

impl fmt::Display for UpdateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SET ")?;
        for (i, action) in self.set_actions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", action.path, action.value)?;
        }
        Ok(())
    }
}

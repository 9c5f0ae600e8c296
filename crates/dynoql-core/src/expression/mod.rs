//! Native DynamoDB expressions.
//!
//! Statement conditions and assignments are lowered into a small AST
//! ([`ast`]) whose `Display` output is the expression string the store
//! accepts. The [`ExpressionBuilder`] allocates `#n`/`:v` placeholders while
//! lowering, and [`evaluator`] applies the same comparison semantics locally
//! where the store offers no native filter.

pub mod ast;
pub mod builder;
pub mod evaluator;

pub use ast::{CompareOp, Expr, Operand, SetAction, UpdateExpr};
pub use builder::{BuiltExpressions, ExpressionBuilder};
pub use evaluator::{matches_all, project};

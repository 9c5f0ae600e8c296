//! SQL-like statement parsing.
//!
//! Three statement kinds are understood, each terminated by an `END` sentinel
//! that the dispatcher appends:
//!
//! ```text
//! SELECT <attr[,attr...]|*> FROM <table> [WHERE <cond>[ AND <cond>...]] [LIMIT <n>|ALL] END
//! UPDATE <table> SET <key=value>[,key=value...] [WHERE <cond>[ AND <cond>...]] [RETURNING <attr>[,attr...]] END
//! DESC TABLE <table> END
//! ```
//!
//! Keywords match case-insensitively as whole words.

pub mod ast;
pub mod literal;
pub mod parser;

pub use ast::{
    ALL_ATTRIBUTES, Assignment, Condition, DescribeStatement, Limit, Operator, SelectStatement,
    Statement, UpdateStatement,
};
pub use literal::Literal;
pub use parser::{END_SENTINEL, parse};

//! Keyword scanner turning statement text into a [`Statement`].
//!
//! Clause boundaries are found by scanning forward for the next expected
//! keyword. A keyword only matches as a whole word: it must be preceded by
//! whitespace (or the start of the text) and followed by whitespace (or the
//! end of the text). Matching is ASCII case-insensitive.

use tracing::warn;

use super::ast::{
    Assignment, Condition, DescribeStatement, Limit, Operator, SelectStatement, Statement,
    UpdateStatement,
};
use crate::error::DynoqlError;

/// Terminator the caller appends to every statement before parsing.
pub const END_SENTINEL: &str = "END";

const CONDITION_SEPARATOR: &str = " AND ";
const LIKE_KEYWORD: &str = " LIKE ";

/// Parse one statement terminated by [`END_SENTINEL`].
///
/// # Errors
///
/// Returns [`DynoqlError::MalformedStatement`] when the statement kind is not
/// recognized, a required clause or the table name is missing, or an
/// assignment has no `=`. Optional clauses default silently.
pub fn parse(text: &str) -> Result<Statement, DynoqlError> {
    let mut scanner = Scanner::new(text);
    if scanner.eat("SELECT") {
        parse_select(scanner).map(Statement::Select)
    } else if scanner.eat("UPDATE") {
        parse_update(scanner).map(Statement::Update)
    } else if scanner.eat("DESC") {
        parse_describe(scanner).map(Statement::Describe)
    } else {
        Err(DynoqlError::malformed(
            "unsupported statement, expected SELECT, UPDATE or DESC TABLE",
        ))
    }
}

fn parse_select(mut scanner: Scanner<'_>) -> Result<SelectStatement, DynoqlError> {
    let (attributes, _) = scanner
        .clause(&["FROM"])
        .ok_or_else(|| DynoqlError::malformed("SELECT without FROM"))?;
    let (table, mut next) = scanner.clause(&["WHERE", "LIMIT", END_SENTINEL]).ok_or_else(missing_end)?;

    let mut conditions = Vec::new();
    if next == "WHERE" {
        let (body, kw) = scanner.clause(&["LIMIT", END_SENTINEL]).ok_or_else(missing_end)?;
        conditions = parse_conditions(body);
        next = kw;
    }

    let mut limit = Limit::default();
    if next == "LIMIT" {
        let (body, _) = scanner.clause(&[END_SENTINEL]).ok_or_else(missing_end)?;
        limit = parse_limit(body);
    }

    let attributes = parse_attribute_list(attributes);
    if attributes.is_empty() {
        return Err(DynoqlError::malformed("SELECT needs at least one attribute"));
    }

    Ok(SelectStatement {
        attributes,
        table: require_table(table)?,
        conditions,
        limit,
    })
}

fn parse_update(mut scanner: Scanner<'_>) -> Result<UpdateStatement, DynoqlError> {
    const AFTER_SET: [&str; 4] = ["WHERE", "RETURNING", "RETRUNING", END_SENTINEL];
    const AFTER_WHERE: [&str; 3] = ["RETURNING", "RETRUNING", END_SENTINEL];

    let (table, _) = scanner
        .clause(&["SET"])
        .ok_or_else(|| DynoqlError::malformed("UPDATE without SET"))?;
    let table = require_table(table)?;

    let (body, mut next) = scanner.clause(&AFTER_SET).ok_or_else(missing_end)?;
    let assignments = parse_assignments(body)?;

    let mut conditions = Vec::new();
    if next == "WHERE" {
        let (body, kw) = scanner.clause(&AFTER_WHERE).ok_or_else(missing_end)?;
        conditions = parse_conditions(body);
        next = kw;
    }

    let mut returning = Vec::new();
    if next != END_SENTINEL {
        let (body, _) = scanner.clause(&[END_SENTINEL]).ok_or_else(missing_end)?;
        returning = parse_attribute_list(body);
    }

    Ok(UpdateStatement {
        table,
        conditions,
        assignments,
        returning,
    })
}

fn parse_describe(mut scanner: Scanner<'_>) -> Result<DescribeStatement, DynoqlError> {
    if !scanner.eat("TABLE") {
        return Err(DynoqlError::malformed("expected TABLE after DESC"));
    }
    let (table, _) = scanner.clause(&[END_SENTINEL]).ok_or_else(missing_end)?;
    Ok(DescribeStatement {
        table: require_table(table)?,
    })
}

fn missing_end() -> DynoqlError {
    DynoqlError::malformed(format!("statement is not terminated by {END_SENTINEL}"))
}

fn require_table(table: &str) -> Result<String, DynoqlError> {
    if table.is_empty() {
        return Err(DynoqlError::malformed("missing table name"));
    }
    Ok(table.to_owned())
}

/// Split a comma-separated attribute list, dropping empty entries.
fn parse_attribute_list(body: &str) -> Vec<String> {
    body.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_limit(body: &str) -> Limit {
    if body.eq_ignore_ascii_case("ALL") {
        return Limit::All;
    }
    match body.parse::<u64>() {
        Ok(n) if n > 0 => Limit::Count(n),
        _ => {
            warn!(limit = body, "unusable LIMIT, falling back to one row");
            Limit::default()
        }
    }
}

fn parse_conditions(body: &str) -> Vec<Condition> {
    if body.is_empty() {
        return Vec::new();
    }
    split_ignore_case(body, CONDITION_SEPARATOR)
        .into_iter()
        .map(parse_condition)
        .collect()
}

/// Split one condition token at the first operator found in scan order.
fn parse_condition(token: &str) -> Condition {
    for op in Operator::SCAN_ORDER {
        let found = match op {
            Operator::Like => find_ignore_case(token, LIKE_KEYWORD).map(|at| (at, LIKE_KEYWORD.len())),
            _ => token.find(op.symbol()).map(|at| (at, op.symbol().len())),
        };
        if let Some((at, len)) = found {
            return Condition::new(token[..at].trim(), op, token[at + len..].trim());
        }
    }
    Condition::malformed()
}

fn parse_assignments(body: &str) -> Result<Vec<Assignment>, DynoqlError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    body.split(',')
        .map(|pair| {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                DynoqlError::malformed(format!("assignment `{}` has no `=`", pair.trim()))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(DynoqlError::malformed(format!(
                    "assignment `{}` has no attribute name",
                    pair.trim()
                )));
            }
            Ok(Assignment {
                key: key.to_owned(),
                value: value.trim().to_owned(),
            })
        })
        .collect()
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_uppercase().find(needle)
}

fn split_ignore_case<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let upper = text.to_ascii_uppercase();
    let mut parts = Vec::new();
    let mut start = 0;
    while let Some(at) = upper[start..].find(separator) {
        parts.push(text[start..start + at].trim());
        start += at + separator.len();
    }
    parts.push(text[start..].trim());
    parts
}

/// Forward-only cursor over the statement text.
///
/// `upper` is the ASCII-uppercased text; uppercasing ASCII keeps byte
/// offsets identical, so positions found in `upper` index `text` directly.
struct Scanner<'a> {
    text: &'a str,
    upper: String,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            upper: text.to_ascii_uppercase(),
            pos: 0,
        }
    }

    /// Consume `keyword` if it is the next word after optional whitespace.
    fn eat(&mut self, keyword: &str) -> bool {
        let rest = &self.upper[self.pos..];
        let at = self.pos + (rest.len() - rest.trim_start().len());
        if self.upper[at..].starts_with(keyword) && self.is_word_end(at + keyword.len()) {
            self.pos = at + keyword.len();
            return true;
        }
        false
    }

    /// Text up to the nearest of `terminators`, trimmed, plus the terminator
    /// that ended it. The cursor moves past the terminator.
    fn clause(&mut self, terminators: &[&'static str]) -> Option<(&'a str, &'static str)> {
        let (at, keyword) = terminators
            .iter()
            .filter_map(|kw| self.find_word(kw).map(|at| (at, *kw)))
            .min_by_key(|(at, _)| *at)?;
        let body = self.text[self.pos..at].trim();
        self.pos = at + keyword.len();
        Some((body, keyword))
    }

    fn find_word(&self, word: &str) -> Option<usize> {
        let mut from = self.pos;
        while let Some(offset) = self.upper[from..].find(word) {
            let at = from + offset;
            if self.is_word_start(at) && self.is_word_end(at + word.len()) {
                return Some(at);
            }
            from = at + word.len();
        }
        None
    }

    fn is_word_start(&self, at: usize) -> bool {
        at == 0 || self.upper.as_bytes()[at - 1].is_ascii_whitespace()
    }

    fn is_word_end(&self, at: usize) -> bool {
        self.upper
            .as_bytes()
            .get(at)
            .is_none_or(u8::is_ascii_whitespace)
    }
}

//! Client-side evaluation of WHERE terms and projections.
//!
//! `GetItem` has no filter expression, so terms beyond the primary key of a
//! point get are checked here. Comparisons follow the store's rules: numbers
//! compare as exact decimals, strings and binary lexicographically, mismatched
//! types only satisfy `<>`, and a missing attribute never matches.

use std::cmp::Ordering;

use dynoql_model::{AttributeValue, Item};

use super::ast::CompareOp;
use crate::statement::{ALL_ATTRIBUTES, Condition};

/// Whether `item` satisfies every condition.
#[must_use]
pub fn matches_all<'c>(item: &Item, conditions: impl IntoIterator<Item = &'c Condition>) -> bool {
    conditions.into_iter().all(|c| matches(item, c))
}

/// Whether `item` satisfies one condition.
#[must_use]
pub fn matches(item: &Item, condition: &Condition) -> bool {
    let Some(attr) = item.get(&condition.key) else {
        return false;
    };
    let operand = AttributeValue::from(condition.literal());
    match CompareOp::from_operator(condition.op) {
        Some(op) => compare_values(attr, &operand, op),
        None => contains(attr, &operand),
    }
}

/// Keep only the requested attributes. `*` or an empty list keeps everything.
pub fn project<S: AsRef<str>>(item: &mut Item, attributes: &[S]) {
    if attributes.is_empty() || attributes.iter().any(|a| a.as_ref() == ALL_ATTRIBUTES) {
        return;
    }
    item.retain(|name, _| attributes.iter().any(|a| a.as_ref() == name));
}

fn compare_values(left: &AttributeValue, right: &AttributeValue, op: CompareOp) -> bool {
    match (left, right) {
        (AttributeValue::S(a), AttributeValue::S(b)) => compare_ord(a, b, op),
        (AttributeValue::N(a), AttributeValue::N(b)) => {
            match (Decimal::parse(a), Decimal::parse(b)) {
                (Some(x), Some(y)) => compare_ord(&x, &y, op),
                _ => false,
            }
        }
        (AttributeValue::B(a), AttributeValue::B(b)) => compare_ord(a, b, op),
        (AttributeValue::Bool(a), AttributeValue::Bool(b)) => compare_ord(a, b, op),
        // Different types are not comparable.
        _ => matches!(op, CompareOp::Ne),
    }
}

fn compare_ord<T: Ord>(a: &T, b: &T, op: CompareOp) -> bool {
    let ordering = a.cmp(b);
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    }
}

/// A DynamoDB number as sign, significant digits and exponent, so that the
/// value is `0.d1d2d3... * 10^exponent`. Zero has no digits.
#[derive(Debug, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    digits: Vec<u8>,
    exponent: i64,
}

impl Decimal {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (mantissa, scale) = match rest.split_once(['e', 'E']) {
            Some((mantissa, exp)) => (mantissa, exp.parse::<i64>().ok()?),
            None => (rest, 0),
        };
        let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int.is_empty() && frac.is_empty() {
            return None;
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let mut digits: Vec<u8> = int.bytes().chain(frac.bytes()).map(|b| b - b'0').collect();
        let leading = digits.iter().take_while(|d| **d == 0).count();
        digits.drain(..leading);
        while digits.last() == Some(&0) {
            digits.pop();
        }
        if digits.is_empty() {
            return Some(Self {
                negative: false,
                digits,
                exponent: 0,
            });
        }

        let exponent = scale
            .checked_add(i64::try_from(int.len()).ok()?)?
            .checked_sub(i64::try_from(leading).ok()?)?;
        Some(Self {
            negative,
            digits,
            exponent,
        })
    }

    fn signum(&self) -> i8 {
        match (self.digits.is_empty(), self.negative) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        }
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.signum().cmp(&other.signum()).then_with(|| {
            let magnitude = self
                .exponent
                .cmp(&other.exponent)
                .then_with(|| self.digits.cmp(&other.digits));
            if self.negative {
                magnitude.reverse()
            } else {
                magnitude
            }
        })
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn contains(attr: &AttributeValue, search: &AttributeValue) -> bool {
    match (attr, search) {
        (AttributeValue::S(s), AttributeValue::S(sub)) => s.contains(sub.as_str()),
        (AttributeValue::Ss(set), AttributeValue::S(val)) => set.contains(val),
        (AttributeValue::L(list), _) => list.contains(search),
        _ => false,
    }
}

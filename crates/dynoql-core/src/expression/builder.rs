//! Lowering of statement parts into native expression strings.

use std::collections::HashMap;

use dynoql_model::AttributeValue;
use dynoql_model::types::{ExpressionAttributeNames, ExpressionAttributeValues};

use super::ast::{CompareOp, Expr, Operand, SetAction, UpdateExpr};
use crate::error::DynoqlError;
use crate::statement::{ALL_ATTRIBUTES, Assignment, Condition, Literal};

/// Placeholder maps collected while building one request's expressions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltExpressions {
    /// `#n` placeholder to attribute name.
    pub names: ExpressionAttributeNames,
    /// `:v` placeholder to attribute value.
    pub values: ExpressionAttributeValues,
}

/// Builds the expressions of a single request.
///
/// Every attribute name is routed through a `#n` placeholder so reserved
/// words (`name`, `status`, ...) never clash with the expression grammar.
/// A name used twice gets the same placeholder; each value gets its own.
#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    names: ExpressionAttributeNames,
    by_attribute: HashMap<String, String>,
    values: ExpressionAttributeValues,
}

impl ExpressionBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder for an attribute name.
    pub fn name(&mut self, attribute: &str) -> Operand {
        if let Some(existing) = self.by_attribute.get(attribute) {
            return Operand::Name(existing.clone());
        }
        let placeholder = format!("#n{}", self.by_attribute.len());
        self.by_attribute
            .insert(attribute.to_owned(), placeholder.clone());
        self.names.insert(placeholder.clone(), attribute.to_owned());
        Operand::Name(placeholder)
    }

    /// Placeholder for a value.
    pub fn value(&mut self, value: AttributeValue) -> Operand {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value);
        Operand::Value(placeholder)
    }

    /// Lower one WHERE term. `LIKE` becomes `contains()`.
    pub fn condition(&mut self, condition: &Condition) -> Expr {
        let path = self.name(&condition.key);
        let operand = self.value(condition.literal().into());
        match CompareOp::from_operator(condition.op) {
            Some(op) => Expr::Compare {
                left: path,
                op,
                right: operand,
            },
            None => Expr::Contains { path, operand },
        }
    }

    /// `AND` of the given terms, or `None` when there are none.
    pub fn conjunction<'c>(
        &mut self,
        conditions: impl IntoIterator<Item = &'c Condition>,
    ) -> Option<Expr> {
        let terms: Vec<Expr> = conditions.into_iter().map(|c| self.condition(c)).collect();
        Expr::conjunction(terms)
    }

    /// Filter expression over the conditions the key condition does not
    /// answer.
    ///
    /// A condition is left out when its field is in `consumed`, or when
    /// `index_name` starts with the field name. The second rule mirrors how
    /// index names embed their field (`category-index`); it also drops any
    /// unrelated field that happens to be such a prefix (`cat`).
    pub fn filter(
        &mut self,
        conditions: &[Condition],
        consumed: &[&str],
        index_name: Option<&str>,
    ) -> Option<String> {
        self.conjunction(conditions.iter().filter(|c| {
            let field = c.key.as_str();
            !consumed.contains(&field) && !index_name.is_some_and(|i| i.starts_with(field))
        }))
        .map(|expr| expr.to_string())
    }

    /// Key-condition expression from an equality on the partition key,
    /// optionally followed by one sort-key comparison.
    ///
    /// # Errors
    ///
    /// Returns [`DynoqlError::ExpressionBuild`] when no term is given or a
    /// term uses an operator key conditions do not support.
    pub fn key_condition(&mut self, conditions: &[&Condition]) -> Result<String, DynoqlError> {
        let mut terms = Vec::with_capacity(conditions.len());
        for condition in conditions {
            let supported = CompareOp::from_operator(condition.op)
                .is_some_and(|op| op.is_key_condition());
            if !supported {
                return Err(DynoqlError::ExpressionBuild(format!(
                    "operator {} cannot be used in a key condition on `{}`",
                    condition.op, condition.key
                )));
            }
            terms.push(self.condition(condition));
        }
        Expr::conjunction(terms)
            .map(|expr| expr.to_string())
            .ok_or_else(|| DynoqlError::ExpressionBuild("empty key condition".to_owned()))
    }

    /// Projection expression, or `None` when every attribute is requested.
    pub fn projection<S: AsRef<str>>(&mut self, attributes: &[S]) -> Option<String> {
        if attributes.is_empty() || attributes.iter().any(|a| a.as_ref() == ALL_ATTRIBUTES) {
            return None;
        }
        let parts: Vec<String> = attributes
            .iter()
            .map(|a| self.name(a.as_ref()).to_string())
            .collect();
        Some(parts.join(", "))
    }

    /// `SET` expression chaining every assignment.
    ///
    /// # Errors
    ///
    /// Returns [`DynoqlError::ExpressionBuild`] when there is nothing to set.
    pub fn update(&mut self, assignments: &[Assignment]) -> Result<String, DynoqlError> {
        if assignments.is_empty() {
            return Err(DynoqlError::ExpressionBuild(
                "UPDATE needs at least one assignment".to_owned(),
            ));
        }
        let set_actions = assignments
            .iter()
            .map(|a| SetAction {
                path: self.name(&a.key),
                value: self.value(Literal::infer(&a.value).into()),
            })
            .collect();
        Ok(UpdateExpr { set_actions }.to_string())
    }

    /// Hand over the placeholder maps.
    #[must_use]
    pub fn finish(self) -> BuiltExpressions {
        BuiltExpressions {
            names: self.names,
            values: self.values,
        }
    }
}

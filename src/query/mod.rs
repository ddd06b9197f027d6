//! Query intent accumulated between table selection and a terminal call

mod operator;

pub use operator::{Direction, Operator};

use crate::core::{DbError, Result};
use serde_json::Value;

/// One `field <op> value` filter
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Pending filters (combined with AND) and at most one sort key.
///
/// Builder calls only append to this state; they never touch disk. A terminal
/// call takes the whole state with [`QueryState::take`], leaving an empty one
/// behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    conditions: Vec<Condition>,
    order: Option<OrderBy>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a condition. The operator is validated here, not at execution time.
    pub fn push_condition(&mut self, field: &str, operator: &str, value: Value) -> Result<()> {
        let operator: Operator = operator.parse()?;
        self.push(field, operator, value)
    }

    pub fn push(&mut self, field: &str, operator: Operator, value: Value) -> Result<()> {
        validate_field(field)?;
        self.conditions.push(Condition {
            field: field.to_string(),
            operator,
            value,
        });
        Ok(())
    }

    /// Sets the sort key, replacing any previous one.
    pub fn set_order(&mut self, field: &str, direction: Direction) -> Result<()> {
        validate_field(field)?;
        self.order = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        Ok(())
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn order(&self) -> Option<&OrderBy> {
        self.order.as_ref()
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.order.is_none()
    }

    /// Moves the pending state out, resetting `self` to empty.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

fn validate_field(field: &str) -> Result<()> {
    if field.trim().is_empty() {
        return Err(DbError::ConfigurationError("Field name cannot be empty".to_string()));
    }
    Ok(())
}

use crate::core::value::{loose_cmp, loose_eq, to_text};
use crate::core::{DbError, Result};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    /// Case-sensitive substring match, no wildcards
    Like,
}

impl Operator {
    /// Evaluates `field_value <op> test_value` with loose comparison rules.
    pub fn matches(self, field_value: &Value, test_value: &Value) -> bool {
        match self {
            Self::Eq => loose_eq(field_value, test_value),
            Self::NotEq => !loose_eq(field_value, test_value),
            Self::Lt => loose_cmp(field_value, test_value) == Some(Ordering::Less),
            Self::Gt => loose_cmp(field_value, test_value) == Some(Ordering::Greater),
            Self::LtEq => matches!(
                loose_cmp(field_value, test_value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::GtEq => matches!(
                loose_cmp(field_value, test_value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Like => to_text(field_value).contains(to_text(test_value).as_ref()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
        }
    }
}

impl FromStr for Operator {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "=" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::NotEq),
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            "<=" => Ok(Self::LtEq),
            ">=" => Ok(Self::GtEq),
            other if other.eq_ignore_ascii_case("like") => Ok(Self::Like),
            other => Err(DbError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(DbError::InvalidOperator(format!("sort direction '{}'", s)))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "ASC"),
            Self::Desc => write!(f, "DESC"),
        }
    }
}

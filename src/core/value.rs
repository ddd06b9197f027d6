//! Loose value comparison
//!
//! Record values are plain `serde_json::Value`s. Filters and sorting compare
//! them with type-juggling semantics: `"5"` equals `5`, `null` equals `false`,
//! numeric strings compare numerically and everything else falls back to a
//! byte-wise string comparison. All of those rules live in this module.

use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::cmp::Ordering;

/// A single table row: field name to value, in insertion order.
pub type Record = Map<String, Value>;

// ============================================================================
// Numbers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn from_json(n: &Number) -> Option<Self> {
        if let Some(i) = n.as_i64() {
            return Some(Self::Int(i));
        }
        n.as_f64().map(Self::Float)
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    fn cmp(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// Floats with a decimal exponent below -4 or above 14 switch to
    /// exponent notation (`1.0E+20`, `1.5E-7`).
    fn render(self) -> String {
        match self {
            Self::Int(i) => i.to_string(),
            Self::Float(f) => {
                let exponent = if f == 0.0 { 0 } else { f.abs().log10().floor() as i32 };
                if (-4..15).contains(&exponent) {
                    f.to_string()
                } else {
                    render_exponent(f)
                }
            }
        }
    }
}

fn render_exponent(f: f64) -> String {
    let formatted = format!("{:e}", f);
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let mantissa = if mantissa.contains('.') {
        mantissa.to_string()
    } else {
        format!("{}.0", mantissa)
    };
    match exponent.strip_prefix('-') {
        Some(digits) => format!("{}E-{}", mantissa, digits),
        None => format!("{}E+{}", mantissa, exponent),
    }
}

fn is_numeric_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// Validates the shape `[+-]? (digits [. digits*] | . digits) ([eE] [+-]? digits)?`.
fn has_numeric_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

fn parse_numeric(s: &str) -> Option<Num> {
    let trimmed = s.trim_matches(is_numeric_space);
    if !has_numeric_shape(trimmed) {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Num::Int(i));
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite()).map(Num::Float)
}

/// Returns true when `s` would be treated as a number by loose comparison.
pub fn is_numeric_str(s: &str) -> bool {
    parse_numeric(s).is_some()
}

/// Interprets a value as an integer, accepting integral floats and numeric strings.
pub fn as_integer(value: &Value) -> Option<i64> {
    let num = match value {
        Value::Number(n) => Num::from_json(n)?,
        Value::String(s) => parse_numeric(s)?,
        _ => return None,
    };
    match num {
        Num::Int(i) => Some(i),
        Num::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Some(f as i64)
        }
        Num::Float(_) => None,
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Boolean interpretation of a value.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => Num::from_json(n).is_some_and(|n| n.as_f64() != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// String form of a value, as used by `LIKE` and number-to-string comparisons.
pub fn to_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("1"),
        Value::Bool(false) => Cow::Borrowed(""),
        Value::Number(n) => match Num::from_json(n) {
            Some(num) => Cow::Owned(num.render()),
            None => Cow::Owned(n.to_string()),
        },
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Array(_) | Value::Object(_) => Cow::Borrowed("Array"),
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Loose equality (`"5" == 5`, `null == false`, `"1e1" == "10"`).
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    loose_cmp(a, b) == Some(Ordering::Equal)
}

/// Loose three-way comparison. `None` means the values are not comparable
/// (containers with different keys), which makes every ordering operator false.
pub fn loose_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, Value::String(s)) => Some("".cmp(s.as_str())),
        (Value::String(s), Value::Null) => Some(s.as_str().cmp("")),
        (Value::Null | Value::Bool(_), _) | (_, Value::Null | Value::Bool(_)) => {
            Some(truthy(a).cmp(&truthy(b)))
        }

        (Value::Number(x), Value::Number(y)) => Num::from_json(x)?.cmp(Num::from_json(y)?),
        (Value::Number(x), Value::String(s)) => compare_number_with_str(x, s),
        (Value::String(s), Value::Number(y)) => {
            compare_number_with_str(y, s).map(Ordering::reverse)
        }
        (Value::String(x), Value::String(y)) => match (parse_numeric(x), parse_numeric(y)) {
            (Some(nx), Some(ny)) => nx.cmp(ny),
            _ => Some(x.as_bytes().cmp(y.as_bytes())),
        },

        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => {
            compare_containers(a, b)
        }
        (Value::Array(_) | Value::Object(_), _) => Some(Ordering::Greater),
        (_, Value::Array(_) | Value::Object(_)) => Some(Ordering::Less),
    }
}

fn compare_number_with_str(n: &Number, s: &str) -> Option<Ordering> {
    let num = Num::from_json(n)?;
    match parse_numeric(s) {
        Some(other) => num.cmp(other),
        None => Some(num.render().as_bytes().cmp(s.as_bytes())),
    }
}

fn container_len(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

fn container_entries(value: &Value) -> Vec<(Cow<'_, str>, &Value)> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (Cow::Owned(i.to_string()), v))
            .collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (Cow::Borrowed(k.as_str()), v)).collect(),
        _ => Vec::new(),
    }
}

fn container_get<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(map) => map.get(key),
        _ => None,
    }
}

fn compare_containers(a: &Value, b: &Value) -> Option<Ordering> {
    match container_len(a).cmp(&container_len(b)) {
        Ordering::Equal => {}
        other => return Some(other),
    }
    for (key, left) in container_entries(a) {
        let right = container_get(b, &key)?;
        match loose_cmp(left, right)? {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
    Some(Ordering::Equal)
}

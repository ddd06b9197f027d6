// ============================================================================
// src/executor/sort.rs - Single-key stable sort
// ============================================================================
//
// - NULL (or a missing field) sorts before every non-NULL value
// - Equal and mutually incomparable values keep their relative order
// - DESC reverses the finished ascending sequence, so ties come out reversed
//   as well
//
// ============================================================================

use crate::core::{DbError, Record, Result, loose_cmp};
use crate::query::{Direction, OrderBy};
use serde_json::Value;
use std::cmp::Ordering;

/// Compares two sort values in ascending order.
pub fn compare_sort_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);

    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => loose_cmp(a, b).unwrap_or(Ordering::Equal),
    }
}

pub struct SortExecutor;

impl SortExecutor {
    /// Sorts `records` in place by `order`.
    ///
    /// Only the first record is checked for the sort field; later records
    /// without it sort as NULL.
    pub fn sort(records: &mut Vec<&Record>, order: &OrderBy) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        if !first.contains_key(&order.field) {
            return Err(DbError::UnknownField(order.field.clone()));
        }

        merge_sort(records, &mut |a: &&Record, b: &&Record| {
            compare_sort_values(a.get(&order.field), b.get(&order.field))
        });

        if order.direction == Direction::Desc {
            records.reverse();
        }
        Ok(())
    }
}

/// Stable top-down merge sort.
///
/// Loose comparison is not a total order, and `slice::sort_by` is allowed to
/// panic on such comparators. This one just produces some stable order.
fn merge_sort<T, F>(items: &mut Vec<T>, compare: &mut F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return;
    }

    let mut right = items.split_off(items.len() / 2);
    let mut left = std::mem::take(items);
    merge_sort(&mut left, compare);
    merge_sort(&mut right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if compare(&right[j], &left[i]) == Ordering::Less {
            merged.push(right[j]);
            j += 1;
        } else {
            merged.push(left[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    *items = merged;
}

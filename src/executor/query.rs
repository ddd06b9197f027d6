use super::sort::SortExecutor;
use crate::core::{DbError, Record, Result};
use crate::query::{Condition, QueryState};
use crate::storage::RecordStore;
use tracing::trace;

/// Evaluates filters, ordering and limits against a loaded table.
pub struct QueryExecutor;

impl QueryExecutor {
    /// True when `record` satisfies every condition.
    ///
    /// Conditions are evaluated in order and stop at the first false one; a
    /// condition on a field the record lacks is an error.
    pub fn matches(record: &Record, conditions: &[Condition]) -> Result<bool> {
        for condition in conditions {
            let value = record
                .get(&condition.field)
                .ok_or_else(|| DbError::UnknownField(condition.field.clone()))?;
            if !condition.operator.matches(value, &condition.value) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Filtered and sorted view over the store, borrowing its records.
    pub fn select<'a>(store: &'a RecordStore, query: &QueryState) -> Result<Vec<&'a Record>> {
        let mut selected = Vec::new();
        for record in store.records() {
            if Self::matches(record, query.conditions())? {
                selected.push(record);
            }
        }

        if let Some(order) = query.order() {
            SortExecutor::sort(&mut selected, order)?;
        }

        trace!(
            scanned = store.len(),
            selected = selected.len(),
            conditions = query.conditions().len(),
            "query evaluated"
        );
        Ok(selected)
    }

    /// All matching records; a `limit` of zero or less means no limit.
    pub fn all(store: &RecordStore, query: &QueryState, limit: Option<i64>) -> Result<Vec<Record>> {
        let mut selected = Self::select(store, query)?;
        if let Some(limit) = limit.filter(|n| *n > 0) {
            selected.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(selected.into_iter().cloned().collect())
    }

    pub fn first(store: &RecordStore, query: &QueryState) -> Result<Record> {
        Self::select(store, query)?
            .first()
            .map(|r| (*r).clone())
            .ok_or(DbError::NotFound)
    }

    pub fn last(store: &RecordStore, query: &QueryState) -> Result<Record> {
        Self::select(store, query)?
            .last()
            .map(|r| (*r).clone())
            .ok_or(DbError::NotFound)
    }

    pub fn count(store: &RecordStore, query: &QueryState) -> Result<usize> {
        Ok(Self::select(store, query)?.len())
    }
}

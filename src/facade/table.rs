use crate::core::{Record, Result};
use crate::executor::{MutationEngine, QueryExecutor};
use crate::query::{Direction, Operator, QueryState};
use crate::storage::{RecordStore, TableFile};
use serde_json::Value;
use std::path::Path;

/// A selected table plus the query being built against it.
///
/// Builder calls (`filter`, `order`) only record intent. Every terminal call
/// (`all`, `get`, `first`, `last`, `count`, `insert`, `update`, `delete`) takes
/// the pending query out of the handle before doing anything else, so the
/// next call starts from an empty query whether the previous one succeeded
/// or not.
#[derive(Debug)]
pub struct TableHandle {
    name: String,
    file: TableFile,
    store: RecordStore,
    query: QueryState,
}

impl TableHandle {
    pub(crate) fn load(name: &str, file: TableFile) -> Result<Self> {
        let store = RecordStore::fresh(&file)?;
        Ok(Self {
            name: name.to_string(),
            file,
            store,
            query: QueryState::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Records as of the last load or mutation.
    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    /// Query accumulated since the last terminal call.
    pub fn pending(&self) -> &QueryState {
        &self.query
    }

    /// Re-reads the table file. The pending query is kept.
    pub fn refresh(&mut self) -> Result<&mut Self> {
        self.store = RecordStore::fresh(&self.file)?;
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Builder
    // ------------------------------------------------------------------

    /// Adds a `field <operator> value` condition. Conditions are ANDed.
    ///
    /// `operator` is one of `=`, `!=`, `<`, `>`, `<=`, `>=`, `LIKE`; anything
    /// else fails immediately with `InvalidOperator`.
    pub fn filter(&mut self, field: &str, operator: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.query.push_condition(field, operator, value.into())?;
        Ok(self)
    }

    pub fn filter_op(&mut self, field: &str, operator: Operator, value: impl Into<Value>) -> Result<&mut Self> {
        self.query.push(field, operator, value.into())?;
        Ok(self)
    }

    /// Sets the sort key, replacing any previous one.
    pub fn order(&mut self, field: &str, direction: Direction) -> Result<&mut Self> {
        self.query.set_order(field, direction)?;
        Ok(self)
    }

    /// Ascending sort on `field`.
    pub fn order_by(&mut self, field: &str) -> Result<&mut Self> {
        self.order(field, Direction::default())
    }

    // ------------------------------------------------------------------
    // Terminal calls
    // ------------------------------------------------------------------

    /// Every matching record; `limit` of `None` or `<= 0` returns all of them.
    pub fn all(&mut self, limit: Option<i64>) -> Result<Vec<Record>> {
        let query = self.query.take();
        QueryExecutor::all(&self.store, &query, limit)
    }

    /// Alias of [`TableHandle::first`].
    pub fn get(&mut self) -> Result<Record> {
        self.first()
    }

    pub fn first(&mut self) -> Result<Record> {
        let query = self.query.take();
        QueryExecutor::first(&self.store, &query)
    }

    pub fn last(&mut self) -> Result<Record> {
        let query = self.query.take();
        QueryExecutor::last(&self.store, &query)
    }

    pub fn count(&mut self) -> Result<usize> {
        let query = self.query.take();
        QueryExecutor::count(&self.store, &query)
    }

    /// Inserts a record and returns its generated id.
    pub fn insert(&mut self, data: impl Into<Value>) -> Result<u64> {
        self.query.take();
        MutationEngine::new(&self.file).insert(data.into(), &mut self.store)
    }

    /// Merges `data` into every record matching the pending filters.
    /// Refuses to run without at least one filter.
    pub fn update(&mut self, data: impl Into<Value>) -> Result<usize> {
        let query = self.query.take();
        MutationEngine::new(&self.file).update(&query, data.into(), &mut self.store)
    }

    /// Removes every record matching the pending filters.
    /// Refuses to run without at least one filter.
    pub fn delete(&mut self) -> Result<usize> {
        let query = self.query.take();
        MutationEngine::new(&self.file).delete(&query, &mut self.store)
    }
}

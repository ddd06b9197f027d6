//! Inserts, updates and deletes
//!
//! Every mutation re-reads the table file, applies the change to that fresh
//! copy and writes it back through [`TableFile::write`]. There is no lock
//! around the read-modify-write sequence: two processes mutating the same
//! table concurrently can both compute the same next id, and the last rename
//! wins. Atomic replace only guarantees readers never see a half-written file.

use super::query::QueryExecutor;
use crate::core::{DbError, Record, Result};
use crate::query::QueryState;
use crate::storage::persistence::json_type_name;
use crate::storage::{ID_FIELD, RecordStore, TableFile};
use serde_json::Value;
use tracing::debug;

pub struct MutationEngine<'a> {
    file: &'a TableFile,
}

impl<'a> MutationEngine<'a> {
    pub fn new(file: &'a TableFile) -> Self {
        Self { file }
    }

    /// Appends `data` with a freshly generated id and returns that id.
    ///
    /// On success `store` is replaced with the records that were written.
    pub fn insert(&self, data: Value, store: &mut RecordStore) -> Result<u64> {
        let data = into_payload(data)?;

        let mut fresh = RecordStore::fresh(self.file)?;
        let id = fresh.next_id();

        let mut record = Record::new();
        record.insert(ID_FIELD.to_string(), Value::from(id));
        record.extend(data);
        fresh.push(record);

        self.file.write(fresh.records())?;
        debug!(table = %self.file.path().display(), id, "record inserted");

        *store = fresh;
        Ok(id)
    }

    /// Merges `data` into every record matching `query` and returns how many
    /// records changed. Fields not named in `data` are kept.
    pub fn update(&self, query: &QueryState, data: Value, store: &mut RecordStore) -> Result<usize> {
        let data = into_payload(data)?;
        if !query.has_conditions() {
            return Err(DbError::MissingFilter("update".to_string()));
        }

        let mut fresh = RecordStore::fresh(self.file)?;
        let mut affected = 0;
        for record in fresh.records_mut().iter_mut() {
            if QueryExecutor::matches(record, query.conditions())? {
                for (field, value) in &data {
                    record.insert(field.clone(), value.clone());
                }
                affected += 1;
            }
        }

        if affected > 0 {
            self.file.write(fresh.records())?;
        }
        debug!(table = %self.file.path().display(), affected, "records updated");

        *store = fresh;
        Ok(affected)
    }

    /// Removes every record matching `query` and returns how many were removed.
    pub fn delete(&self, query: &QueryState, store: &mut RecordStore) -> Result<usize> {
        if !query.has_conditions() {
            return Err(DbError::MissingFilter("delete".to_string()));
        }

        let fresh = RecordStore::fresh(self.file)?;
        let total = fresh.len();
        let mut kept = Vec::with_capacity(total);
        for record in fresh.into_records() {
            if !QueryExecutor::matches(&record, query.conditions())? {
                kept.push(record);
            }
        }

        let removed = total - kept.len();
        if removed > 0 {
            self.file.write(&kept)?;
        }
        debug!(table = %self.file.path().display(), removed, "records deleted");

        *store = RecordStore::new(kept);
        Ok(removed)
    }
}

/// Checks an insert/update payload: a non-empty object without an `id` key.
fn into_payload(data: Value) -> Result<Record> {
    let map = match data {
        Value::Object(map) => map,
        other => return Err(DbError::NotAMapping(json_type_name(&other).to_string())),
    };
    if map.contains_key(ID_FIELD) {
        return Err(DbError::ImmutableField(ID_FIELD.to_string()));
    }
    if map.is_empty() {
        return Err(DbError::EmptyPayload);
    }
    Ok(map)
}

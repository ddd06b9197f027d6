use super::persistence::TableFile;
use crate::core::value::as_integer;
use crate::core::{Record, Result};

pub const ID_FIELD: &str = "id";

/// In-memory copy of one table, in file order.
///
/// Stores are never cached across selections: queries run against the copy
/// loaded when the table was selected, mutations always start from
/// [`RecordStore::fresh`].
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Re-reads the table file from disk.
    pub fn fresh(file: &TableFile) -> Result<Self> {
        Ok(Self::new(file.read()?))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<Record> {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest integer `id` in the table, 0 when there is none.
    pub fn max_id(&self) -> u64 {
        self.records
            .iter()
            .filter_map(|r| r.get(ID_FIELD).and_then(as_integer))
            .filter(|id| *id > 0)
            .map(|id| id as u64)
            .max()
            .unwrap_or(0)
    }

    pub fn next_id(&self) -> u64 {
        self.max_id() + 1
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}

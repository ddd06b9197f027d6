//! Table file persistence
//!
//! A table is a single JSON file holding an array of objects. Writes go to a
//! sibling temporary file that is renamed over the target, so readers only
//! ever see the old or the new content.

use crate::core::{DbError, Record, Result};
use serde_json::Value as JsonValue;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, PersistError};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct TableFile {
    path: PathBuf,
    pretty: bool,
    sync_writes: bool,
}

impl TableFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: false,
            sync_writes: true,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads every record. A missing or blank file is an empty table.
    pub fn read(&self) -> Result<Vec<Record>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "table file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(DbError::io("Failed to read table", &self.path, e)),
        };

        let text = String::from_utf8(bytes)
            .map_err(|e| DbError::malformed(&self.path, format!("not valid UTF-8: {}", e)))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: JsonValue = serde_json::from_str(&text)
            .map_err(|e| DbError::malformed(&self.path, e.to_string()))?;

        let items = match parsed {
            JsonValue::Array(items) => items,
            other => {
                return Err(DbError::malformed(
                    &self.path,
                    format!("expected a JSON array of objects, found {}", json_type_name(&other)),
                ));
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                JsonValue::Object(record) => records.push(record),
                other => {
                    return Err(DbError::malformed(
                        &self.path,
                        format!("element {} is {}, expected an object", index, json_type_name(&other)),
                    ));
                }
            }
        }

        debug!(path = %self.path.display(), records = records.len(), "table loaded");
        Ok(records)
    }

    /// Atomically replaces the table file with `records`.
    pub fn write(&self, records: &[Record]) -> Result<()> {
        self.write_with_hook(records, |_| Ok(()))
    }

    /// Same as [`TableFile::write`], running `before_rename` once the temporary
    /// file is fully written. A hook error aborts the write like any I/O failure.
    pub(crate) fn write_with_hook<F>(&self, records: &[Record], before_rename: F) -> Result<()>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| DbError::io("Failed to create directory", &dir, e))?;

        let serialized = if self.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        }
        .map_err(|e| DbError::SerializationError(e.to_string()))?;

        let prefix = format!(
            ".{}.",
            self.path.file_name().and_then(|n| n.to_str()).unwrap_or("table")
        );
        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| DbError::io("Failed to create temp file in", &dir, e))?;

        if let Err(e) = write_contents(&mut temp, &serialized, self.sync_writes) {
            return Err(discard(temp, DbError::io("Failed to write temp file for", &self.path, e)));
        }

        if let Err(e) = before_rename(temp.path()) {
            return Err(discard(temp, DbError::io("Failed to write temp file for", &self.path, e)));
        }

        temp.persist(&self.path).map_err(|PersistError { error, file }| {
            discard(
                file,
                DbError::RenameFailed {
                    path: self.path.display().to_string(),
                    reason: error.to_string(),
                },
            )
        })?;

        debug!(path = %self.path.display(), records = records.len(), bytes = serialized.len(), "table written");
        Ok(())
    }

    /// Deletes the table file. Returns false when there was nothing to delete.
    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DbError::io("Failed to remove table", &self.path, e)),
        }
    }
}

fn write_contents(temp: &mut NamedTempFile, data: &[u8], sync: bool) -> io::Result<()> {
    temp.write_all(data)?;
    temp.flush()?;
    if sync {
        temp.as_file().sync_all()?;
    }
    Ok(())
}

/// Removes the temp file and hands back the error that caused the abort.
fn discard(temp: NamedTempFile, cause: DbError) -> DbError {
    let temp_path = temp.path().to_path_buf();
    if let Err(e) = temp.close() {
        warn!(path = %temp_path.display(), error = %e, "failed to remove temp file");
    }
    cause
}

pub(crate) fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

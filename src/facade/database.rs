use super::table::TableHandle;
use crate::config::FileDbConfig;
use crate::core::{DbError, Result};
use crate::storage::TableFile;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const MAX_NAME_LEN: usize = 64;

/// Entry point: a root directory holding one directory per database.
///
/// # Examples
///
/// ```no_run
/// use rustfiledb::{FileDb, FileDbConfig};
/// use serde_json::json;
///
/// # fn main() -> rustfiledb::Result<()> {
/// let db = FileDb::new(FileDbConfig::new("storage"))?;
/// let app = db.open("app")?;
///
/// let mut users = app.table("users")?;
/// let id = users.insert(json!({"name": "Alice", "age": 30}))?;
/// let _alice = users.filter("id", "=", id)?.get()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileDb {
    config: Arc<FileDbConfig>,
}

impl FileDb {
    pub fn new(config: FileDbConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Default configuration rooted at `root`.
    pub fn at(root: impl AsRef<Path>) -> Result<Self> {
        Self::new(FileDbConfig::new(root))
    }

    pub fn config(&self) -> &FileDbConfig {
        &self.config
    }

    /// Opens an existing database directory.
    ///
    /// Fails with `ConfigurationError` when the directory is missing or
    /// unreadable, unless `create_missing_databases` is set.
    pub fn open(&self, name: &str) -> Result<Database> {
        validate_name("database", name)?;
        let path = self.config.root.join(name);

        if !path.exists() && self.config.create_missing_databases {
            return self.create_database(name);
        }

        if !path.is_dir() {
            return Err(DbError::ConfigurationError(format!(
                "Database '{}' not found at '{}'",
                name,
                path.display()
            )));
        }

        fs::read_dir(&path).map_err(|e| {
            DbError::ConfigurationError(format!("Database '{}' is not readable: {}", name, e))
        })?;

        debug!(database = name, path = %path.display(), "database opened");
        Ok(Database::new(name, path, Arc::clone(&self.config)))
    }

    /// Creates the database directory if needed and opens it.
    pub fn create_database(&self, name: &str) -> Result<Database> {
        validate_name("database", name)?;
        let path = self.config.root.join(name);
        fs::create_dir_all(&path).map_err(|e| DbError::io("Failed to create database", &path, e))?;

        debug!(database = name, path = %path.display(), "database created");
        Ok(Database::new(name, path, Arc::clone(&self.config)))
    }

    /// Names of all database directories under the root, sorted.
    pub fn databases(&self) -> Result<Vec<String>> {
        let root = &self.config.root;
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DbError::io("Failed to list databases in", root, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DbError::io("Failed to list databases in", root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(name) = file_name.to_str()
                && validate_name("database", name).is_ok()
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// A database directory.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    path: PathBuf,
    config: Arc<FileDbConfig>,
}

impl Database {
    fn new(name: &str, path: PathBuf, config: Arc<FileDbConfig>) -> Self {
        Self {
            name: name.to_string(),
            path,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn table_file(&self, name: &str) -> Result<TableFile> {
        validate_name("table", name)?;
        let path = self.path.join(format!("{}.{}", name, self.config.extension));
        Ok(TableFile::new(path)
            .pretty(self.config.pretty)
            .sync_writes(self.config.sync_writes))
    }

    /// Selects a table, reading its file from disk.
    ///
    /// A table whose file does not exist yet is simply empty.
    pub fn table(&self, name: &str) -> Result<TableHandle> {
        TableHandle::load(name, self.table_file(name)?)
    }

    /// Names of all tables in this database, sorted.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.path)
            .map_err(|e| DbError::io("Failed to list tables in", &self.path, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DbError::io("Failed to list tables in", &self.path, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(self.config.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_name("table", stem).is_ok()
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn has_table(&self, name: &str) -> Result<bool> {
        Ok(self.table_file(name)?.exists())
    }

    /// Deletes the table file. Returns false when the table did not exist.
    pub fn drop_table(&self, name: &str) -> Result<bool> {
        let dropped = self.table_file(name)?.remove()?;
        debug!(database = %self.name, table = name, dropped, "table dropped");
        Ok(dropped)
    }
}

/// Database and table names become path components, so they are restricted
/// to letters, digits, `_` and `-`.
fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DbError::ConfigurationError(format!("{} name cannot be empty", kind)));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(DbError::ConfigurationError(format!(
            "{} name '{}' too long (max {} characters)",
            kind, name, MAX_NAME_LEN
        )));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(DbError::ConfigurationError(format!(
            "{} name '{}' can only contain letters, numbers, '_' and '-'",
            kind, name
        )));
    }

    Ok(())
}

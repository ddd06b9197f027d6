use crate::core::{DbError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File database configuration
///
/// Databases are directories under `root`, tables are `{table}.{extension}`
/// files inside them. Missing keys fall back to [`FileDbConfig::default`]
/// when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDbConfig {
    /// Directory holding one sub-directory per database
    pub root: PathBuf,

    /// Table file extension, without the leading dot
    pub extension: String,

    /// Pretty-print table files instead of writing compact JSON
    pub pretty: bool,

    /// fsync the temporary file before it replaces the table file
    pub sync_writes: bool,

    /// Create a database directory on `open` instead of failing
    pub create_missing_databases: bool,
}

impl FileDbConfig {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }

    pub fn create_missing_databases(mut self, create: bool) -> Self {
        self.create_missing_databases = create;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(DbError::ConfigurationError("Database root cannot be empty".to_string()));
        }

        if self.extension.is_empty() {
            return Err(DbError::ConfigurationError("Table file extension cannot be empty".to_string()));
        }

        if !self.extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DbError::ConfigurationError(format!(
                "Table file extension '{}' must be alphanumeric",
                self.extension
            )));
        }

        Ok(())
    }
}

impl Default for FileDbConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("storage"),
            extension: "json".to_string(),
            pretty: false,
            sync_writes: true,
            create_missing_databases: false,
        }
    }
}

// ============================================================================
// RustFileDB Library
// ============================================================================
//
// Tables are JSON files (`{root}/{database}/{table}.json`) holding an array of
// objects. Queries load the file, filter and sort in memory; mutations re-read
// the file and replace it atomically.
//
// Layout:
// - `core`     - errors, record type, loose value comparison
// - `storage`  - table file I/O and the in-memory record store
// - `query`    - filter/sort intent (operators, directions, query state)
// - `executor` - query evaluation and mutations
// - `facade`   - FileDb / Database / TableHandle entry points
//
// ============================================================================

pub mod config;
pub mod core;
pub mod executor;
pub mod facade;
pub mod query;
pub mod storage;

// Re-export main types for convenience
pub use config::FileDbConfig;
pub use crate::core::{DbError, Record, Result};
pub use facade::{Database, FileDb, TableHandle};
pub use query::{Direction, Operator, QueryState};

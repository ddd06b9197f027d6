mod database;
mod table;

pub use database::{Database, FileDb};
pub use table::TableHandle;

pub mod persistence;
pub mod store;

pub use persistence::TableFile;
pub use store::{ID_FIELD, RecordStore};

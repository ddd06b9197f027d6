pub mod mutation;
pub mod query;
pub mod sort;

pub use mutation::MutationEngine;
pub use query::QueryExecutor;
pub use sort::SortExecutor;

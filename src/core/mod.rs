pub mod error;
pub mod value;

pub use error::{DbError, Result};
pub use value::{Record, loose_cmp, loose_eq};

//! Row-store client used by every CRM service.
//!
//! Business tables are accessed as opaque JSON rows through a small fluent
//! query builder (`Select::table(name).eq(col, val).order(col, asc)`).
//! [`SeaRowStore`] runs those queries on PostgreSQL.

pub mod error;
pub mod query;
pub mod sea;

pub use error::StoreError;
pub use query::{Filter, ID_COLUMN, Ordering, Row, RowStore, Select};
pub use sea::SeaRowStore;

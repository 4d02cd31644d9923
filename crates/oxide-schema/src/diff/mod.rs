//! Schema differences.
//!
//! The [`Comparator`](crate::comparator::Comparator) produces these values;
//! a [`Platform`](crate::platform::Platform) renders them into migration
//! statements.

mod column;
mod schema;
mod table;

pub use column::ColumnDiff;
pub use schema::SchemaDiff;
pub use table::TableDiff;

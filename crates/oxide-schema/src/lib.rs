//! Relational schema modelling and DDL generation for Rust.
//!
//! `oxide-schema` describes a database schema in memory, compares two
//! schemas, and renders the difference as SQL for a target platform:
//! - The model (`Schema`, `Table`, `Column`, `Index`, `ForeignKeyConstraint`,
//!   `Sequence`) validates every mutation before applying it
//! - The `Comparator` produces `SchemaDiff`/`TableDiff`/`ColumnDiff` values
//! - A `Platform` renders tables, diffs and expressions for one SQL dialect
//!
//! # Architecture
//!
//! - **Model** - Named assets, keyed case-insensitively, with namespaces
//! - **Comparator** - Structural diff with rename detection
//! - **Diff** - Value objects rendered through `SchemaDiff::to_sql`
//! - **Platform** - Dialect trait with shared defaults; `MySqlPlatform` is
//!   the reference implementation
//! - **Visitor** - Schema traversal used by the create and drop collectors
//!
//! # Example
//!
//! ```rust
//! use oxide_schema::prelude::*;
//!
//! let mut from = Schema::new();
//! let users = from.create_table("users").unwrap();
//! users
//!     .add_column(Column::new("id", ColumnType::Int).with_autoincrement(true))
//!     .unwrap();
//! users.set_primary_key(&["id"], None).unwrap();
//!
//! let mut to = from.clone();
//! to.table_mut("users")
//!     .unwrap()
//!     .add_column(Column::new("email", ColumnType::VarChar).with_length(180))
//!     .unwrap();
//!
//! let platform = MySqlPlatform::new();
//! let sql = from.migrate_to_sql(&to, &platform).unwrap();
//! assert_eq!(sql, vec!["ALTER TABLE users ADD email VARCHAR(180) NOT NULL"]);
//! ```

pub mod asset;
pub mod column;
pub mod comparator;
pub mod diff;
pub mod error;
pub mod foreign_key;
pub mod index;
pub mod platform;
pub mod schema;
pub mod schema_config;
pub mod sequence;
pub mod table;
pub mod types;
pub mod visitor;

pub use error::{Result, SchemaError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::asset::{Asset, Identifier};
    pub use crate::column::{Column, DefaultValue};
    pub use crate::comparator::Comparator;
    pub use crate::diff::{ColumnDiff, SchemaDiff, TableDiff};
    pub use crate::error::{Result, SchemaError};
    pub use crate::foreign_key::{ForeignKeyConstraint, ForeignTableRef};
    pub use crate::index::Index;
    pub use crate::platform::{
        CreateFlags, DateIntervalUnit, DateOperator, MySqlPlatform, Platform,
        TransactionIsolationLevel, TrimMode,
    };
    pub use crate::schema::Schema;
    pub use crate::schema_config::SchemaConfig;
    pub use crate::sequence::Sequence;
    pub use crate::table::Table;
    pub use crate::types::{ColumnType, TypeCategory};
    pub use crate::visitor::{
        CreateSchemaSqlCollector, DropSchemaSqlCollector, RemoveNamespacedAssets, Visitor,
    };
}

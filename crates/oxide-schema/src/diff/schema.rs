//! Schema differences.
//!
//! A [`SchemaDiff`] is produced by the comparator and rendered into an
//! ordered list of statements by [`SchemaDiff::to_sql`]. Statement order
//! matters: constraints are dropped before the tables they point at, and
//! foreign keys of new tables are created after every new table exists.

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::TableDiff;
use crate::asset::Asset;
use crate::error::Result;
use crate::foreign_key::ForeignKeyConstraint;
use crate::platform::{CreateFlags, Platform};
use crate::schema::Schema;
use crate::sequence::Sequence;
use crate::table::Table;

/// Everything that changed between two schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaDiff {
    /// The schema the diff starts from.
    pub from_schema: Option<Schema>,
    pub new_namespaces: IndexMap<String, String>,
    pub removed_namespaces: IndexMap<String, String>,
    pub new_tables: IndexMap<String, Table>,
    pub changed_tables: IndexMap<String, TableDiff>,
    pub removed_tables: IndexMap<String, Table>,
    pub new_sequences: Vec<Sequence>,
    pub changed_sequences: Vec<Sequence>,
    pub removed_sequences: Vec<Sequence>,
    /// Foreign keys of surviving tables that point at removed tables.
    pub orphaned_foreign_keys: Vec<ForeignKeyConstraint>,
}

impl SchemaDiff {
    /// Creates an empty diff.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the diff carries no change at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_namespaces.is_empty()
            && self.removed_namespaces.is_empty()
            && self.new_tables.is_empty()
            && self.changed_tables.is_empty()
            && self.removed_tables.is_empty()
            && self.new_sequences.is_empty()
            && self.changed_sequences.is_empty()
            && self.removed_sequences.is_empty()
            && self.orphaned_foreign_keys.is_empty()
    }

    /// Returns the statements applying this diff.
    pub fn to_sql(&self, platform: &dyn Platform) -> Result<Vec<String>> {
        self.render(platform, false)
    }

    /// Returns the statements applying this diff without dropping anything.
    ///
    /// Removed tables, removed sequences and orphaned foreign keys are left
    /// in place.
    pub fn to_save_sql(&self, platform: &dyn Platform) -> Result<Vec<String>> {
        self.render(platform, true)
    }

    fn render(&self, platform: &dyn Platform, save_mode: bool) -> Result<Vec<String>> {
        let mut sql = Vec::new();

        if platform.supports_schemas() {
            for namespace in self.new_namespaces.values() {
                sql.push(platform.create_schema_sql(namespace)?);
            }
        }

        if platform.supports_foreign_key_constraints() && !save_mode {
            for fk in &self.orphaned_foreign_keys {
                let Some(table) = fk.local_table() else {
                    warn!(foreign_key = %fk.name(), "Skipped orphaned foreign key without a local table");
                    continue;
                };
                sql.push(platform.drop_foreign_key_sql(fk, &table.quoted_name(platform)));
            }
        }

        if platform.supports_sequences() {
            for sequence in &self.changed_sequences {
                sql.push(platform.alter_sequence_sql(sequence)?);
            }
            if !save_mode {
                for sequence in &self.removed_sequences {
                    sql.push(platform.drop_sequence_sql(sequence)?);
                }
            }
            for sequence in &self.new_sequences {
                sql.push(platform.create_sequence_sql(sequence)?);
            }
        }

        let mut foreign_key_sql = Vec::new();
        for table in self.new_tables.values() {
            sql.extend(platform.create_table_sql(table, CreateFlags::CREATE_INDEXES)?);

            if platform.supports_foreign_key_constraints() {
                let name = table.quoted_name(platform);
                for fk in table.foreign_keys().values() {
                    foreign_key_sql.push(platform.create_foreign_key_sql(fk, &name)?);
                }
            }
        }
        sql.extend(foreign_key_sql);

        if !save_mode {
            for table in self.removed_tables.values() {
                sql.push(platform.drop_table_sql(&table.quoted_name(platform)));
            }
        }

        for table_diff in self.changed_tables.values() {
            sql.extend(platform.alter_table_sql(table_diff)?);
        }

        debug!(
            platform = platform.name(),
            save_mode,
            statements = sql.len(),
            "Rendered schema diff"
        );

        Ok(sql)
    }
}
